use crate::bitreader::BitReader;
use crate::eg::read_ue;
use crate::{range_check, Error, Result};

/// st_ref_pic_set(stRpsIdx) syntax (7.3.7) plus the derived arrays of
/// 7.4.8. Derivation happens eagerly at parse time so later sets can
/// predict from this one without revisiting it.
#[derive(Debug, Clone, Default)]
pub struct ShortTermRefPicSet {
    pub st_rps_idx: u32,

    pub inter_ref_pic_set_prediction_flag: bool,
    pub delta_idx_minus1: u32,
    pub delta_rps_sign: bool,
    pub abs_delta_rps_minus1: u32,
    pub used_by_curr_pic_flag: Vec<bool>,
    pub use_delta_flag: Vec<bool>,

    pub delta_poc_s0_minus1: Vec<u32>,
    pub used_by_curr_pic_s0_flag: Vec<bool>,
    pub delta_poc_s1_minus1: Vec<u32>,
    pub used_by_curr_pic_s1_flag: Vec<bool>,

    // Derived per 7.4.8.
    pub num_negative_pics: u32,
    pub num_positive_pics: u32,
    pub delta_poc_s0: Vec<i32>,
    pub used_by_curr_pic_s0: Vec<bool>,
    pub delta_poc_s1: Vec<i32>,
    pub used_by_curr_pic_s1: Vec<bool>,
}

impl ShortTermRefPicSet {
    /// NumDeltaPocs (7-71).
    pub fn num_delta_pocs(&self) -> u32 {
        self.num_negative_pics + self.num_positive_pics
    }

    /// Parses one set. `prior` is the ordered vector of sets already
    /// parsed for the same SPS; inter-set prediction may only reference a
    /// strictly earlier entry. `max_num_pics` is the DPB bound
    /// (sps_max_dec_pic_buffering_minus1 of the highest sub-layer).
    pub fn parse(
        reader: &mut BitReader,
        st_rps_idx: u32,
        num_short_term_ref_pic_sets: u32,
        prior: &[ShortTermRefPicSet],
        max_num_pics: u32,
    ) -> Result<Self> {
        let mut rps = ShortTermRefPicSet {
            st_rps_idx,
            ..Default::default()
        };

        if st_rps_idx != 0 {
            rps.inter_ref_pic_set_prediction_flag = reader.read_flag()?;
        }

        if rps.inter_ref_pic_set_prediction_flag {
            if st_rps_idx == num_short_term_ref_pic_sets {
                rps.delta_idx_minus1 = read_ue(reader)?;
                range_check(
                    "delta_idx_minus1",
                    rps.delta_idx_minus1 as i64,
                    0,
                    st_rps_idx as i64 - 1,
                )?;
            }

            // RefRpsIdx (7-59): a strictly earlier set in parse order.
            let ref_rps_idx = st_rps_idx - (rps.delta_idx_minus1 + 1);
            let ref_rps = prior.get(ref_rps_idx as usize).ok_or(Error::SyntaxViolation {
                field: "delta_idx_minus1",
                value: rps.delta_idx_minus1 as i64,
                min: 0,
                max: prior.len() as i64 - 1,
            })?;

            rps.delta_rps_sign = reader.read_flag()?;
            rps.abs_delta_rps_minus1 = read_ue(reader)?;
            range_check(
                "abs_delta_rps_minus1",
                rps.abs_delta_rps_minus1 as i64,
                0,
                32767,
            )?;

            let ref_num_delta_pocs = ref_rps.num_delta_pocs();
            for _ in 0..=ref_num_delta_pocs {
                let used = reader.read_flag()?;
                rps.used_by_curr_pic_flag.push(used);
                // use_delta_flag is inferred to 1 when absent.
                let use_delta = if !used { reader.read_flag()? } else { true };
                rps.use_delta_flag.push(use_delta);
            }

            rps.derive_from_reference(ref_rps);
        } else {
            let num_negative_pics = read_ue(reader)?;
            range_check("num_negative_pics", num_negative_pics as i64, 0, max_num_pics as i64)?;
            let num_positive_pics = read_ue(reader)?;
            range_check(
                "num_positive_pics",
                num_positive_pics as i64,
                0,
                max_num_pics as i64 - num_negative_pics as i64,
            )?;

            for _ in 0..num_negative_pics {
                let delta = read_ue(reader)?;
                range_check("delta_poc_s0_minus1", delta as i64, 0, 32767)?;
                rps.delta_poc_s0_minus1.push(delta);
                rps.used_by_curr_pic_s0_flag.push(reader.read_flag()?);
            }

            for _ in 0..num_positive_pics {
                let delta = read_ue(reader)?;
                range_check("delta_poc_s1_minus1", delta as i64, 0, 32767)?;
                rps.delta_poc_s1_minus1.push(delta);
                rps.used_by_curr_pic_s1_flag.push(reader.read_flag()?);
            }

            rps.derive_direct();
        }

        if rps.num_delta_pocs() > max_num_pics {
            return Err(Error::SyntaxViolation {
                field: "num_delta_pocs",
                value: rps.num_delta_pocs() as i64,
                min: 0,
                max: max_num_pics as i64,
            });
        }

        Ok(rps)
    }

    /// Direct derivation (7-67..7-70): cumulative POC deltas.
    fn derive_direct(&mut self) {
        self.num_negative_pics = self.delta_poc_s0_minus1.len() as u32;
        self.num_positive_pics = self.delta_poc_s1_minus1.len() as u32;

        let mut poc = 0i32;
        for &minus1 in &self.delta_poc_s0_minus1 {
            poc -= minus1 as i32 + 1;
            self.delta_poc_s0.push(poc);
        }
        self.used_by_curr_pic_s0 = self.used_by_curr_pic_s0_flag.clone();

        let mut poc = 0i32;
        for &minus1 in &self.delta_poc_s1_minus1 {
            poc += minus1 as i32 + 1;
            self.delta_poc_s1.push(poc);
        }
        self.used_by_curr_pic_s1 = self.used_by_curr_pic_s1_flag.clone();
    }

    /// Predictive derivation from the referenced set (7-61..7-66).
    fn derive_from_reference(&mut self, ref_rps: &ShortTermRefPicSet) {
        let delta_rps = if self.delta_rps_sign { -1i32 } else { 1i32 }
            * (self.abs_delta_rps_minus1 as i32 + 1);

        let ref_neg = ref_rps.num_negative_pics as usize;
        let ref_pos = ref_rps.num_positive_pics as usize;
        let ref_num_delta = ref_neg + ref_pos;

        // Negative half (7-61): referenced positive pics that land below
        // zero, then deltaRps itself, then referenced negative pics.
        for j in (0..ref_pos).rev() {
            let d_poc = ref_rps.delta_poc_s1[j] + delta_rps;
            if d_poc < 0 && self.use_delta_flag[ref_neg + j] {
                self.delta_poc_s0.push(d_poc);
                self.used_by_curr_pic_s0
                    .push(self.used_by_curr_pic_flag[ref_neg + j]);
            }
        }
        if delta_rps < 0 && self.use_delta_flag[ref_num_delta] {
            self.delta_poc_s0.push(delta_rps);
            self.used_by_curr_pic_s0
                .push(self.used_by_curr_pic_flag[ref_num_delta]);
        }
        for j in 0..ref_neg {
            let d_poc = ref_rps.delta_poc_s0[j] + delta_rps;
            if d_poc < 0 && self.use_delta_flag[j] {
                self.delta_poc_s0.push(d_poc);
                self.used_by_curr_pic_s0.push(self.used_by_curr_pic_flag[j]);
            }
        }
        self.num_negative_pics = self.delta_poc_s0.len() as u32;

        // Positive half (7-63), mirrored.
        for j in (0..ref_neg).rev() {
            let d_poc = ref_rps.delta_poc_s0[j] + delta_rps;
            if d_poc > 0 && self.use_delta_flag[j] {
                self.delta_poc_s1.push(d_poc);
                self.used_by_curr_pic_s1.push(self.used_by_curr_pic_flag[j]);
            }
        }
        if delta_rps > 0 && self.use_delta_flag[ref_num_delta] {
            self.delta_poc_s1.push(delta_rps);
            self.used_by_curr_pic_s1
                .push(self.used_by_curr_pic_flag[ref_num_delta]);
        }
        for j in 0..ref_pos {
            let d_poc = ref_rps.delta_poc_s1[j] + delta_rps;
            if d_poc > 0 && self.use_delta_flag[ref_neg + j] {
                self.delta_poc_s1.push(d_poc);
                self.used_by_curr_pic_s1
                    .push(self.used_by_curr_pic_flag[ref_neg + j]);
            }
        }
        self.num_positive_pics = self.delta_poc_s1.len() as u32;
    }
}
