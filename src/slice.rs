use crate::bitreader::BitReader;
use crate::eg::{read_se, read_ue};
use crate::nal::NalUnitType;
use crate::pps::Pps;
use crate::rps::ShortTermRefPicSet;
use crate::sps::Sps;
use crate::{range_check, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceType {
    B = 0,
    P = 1,
    I = 2,
}

impl SliceType {
    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            0 => Some(SliceType::B),
            1 => Some(SliceType::P),
            2 => Some(SliceType::I),
            _ => None,
        }
    }

    pub fn is_inter(&self) -> bool {
        matches!(self, SliceType::B | SliceType::P)
    }
}

/// ref_pic_lists_modification() syntax (7.3.6.2).
#[derive(Debug, Clone, Default)]
pub struct RefPicListsModification {
    pub ref_pic_list_modification_flag_l0: bool,
    pub list_entry_l0: Vec<u32>,
    pub ref_pic_list_modification_flag_l1: bool,
    pub list_entry_l1: Vec<u32>,
}

impl RefPicListsModification {
    fn parse(
        reader: &mut BitReader,
        slice_type: SliceType,
        num_ref_idx_l0_active_minus1: u32,
        num_ref_idx_l1_active_minus1: u32,
        num_pic_total_curr: u32,
    ) -> Result<Self> {
        let mut rplm = RefPicListsModification::default();
        let entry_bits = ceil_log2(num_pic_total_curr);

        rplm.ref_pic_list_modification_flag_l0 = reader.read_flag()?;
        if rplm.ref_pic_list_modification_flag_l0 {
            for _ in 0..=num_ref_idx_l0_active_minus1 {
                rplm.list_entry_l0.push(reader.read_bits(entry_bits)?);
            }
        }

        if slice_type == SliceType::B {
            rplm.ref_pic_list_modification_flag_l1 = reader.read_flag()?;
            if rplm.ref_pic_list_modification_flag_l1 {
                for _ in 0..=num_ref_idx_l1_active_minus1 {
                    rplm.list_entry_l1.push(reader.read_bits(entry_bits)?);
                }
            }
        }

        Ok(rplm)
    }
}

/// pred_weight_table() syntax (7.3.6.3).
#[derive(Debug, Clone, Default)]
pub struct PredWeightTable {
    pub luma_log2_weight_denom: u32,
    pub delta_chroma_log2_weight_denom: i32,
    pub luma_weight_l0_flag: Vec<bool>,
    pub chroma_weight_l0_flag: Vec<bool>,
    pub delta_luma_weight_l0: Vec<i32>,
    pub luma_offset_l0: Vec<i32>,
    pub delta_chroma_weight_l0: Vec<[i32; 2]>,
    pub delta_chroma_offset_l0: Vec<[i32; 2]>,
    pub luma_weight_l1_flag: Vec<bool>,
    pub chroma_weight_l1_flag: Vec<bool>,
    pub delta_luma_weight_l1: Vec<i32>,
    pub luma_offset_l1: Vec<i32>,
    pub delta_chroma_weight_l1: Vec<[i32; 2]>,
    pub delta_chroma_offset_l1: Vec<[i32; 2]>,
}

impl PredWeightTable {
    fn parse(
        reader: &mut BitReader,
        slice_type: SliceType,
        chroma_array_type: u32,
        num_ref_idx_l0_active_minus1: u32,
        num_ref_idx_l1_active_minus1: u32,
    ) -> Result<Self> {
        let mut pwt = PredWeightTable::default();

        pwt.luma_log2_weight_denom = read_ue(reader)?;
        range_check("luma_log2_weight_denom", pwt.luma_log2_weight_denom as i64, 0, 7)?;
        if chroma_array_type != 0 {
            pwt.delta_chroma_log2_weight_denom = read_se(reader)?;
        }

        Self::parse_list(
            reader,
            chroma_array_type,
            num_ref_idx_l0_active_minus1,
            &mut pwt.luma_weight_l0_flag,
            &mut pwt.chroma_weight_l0_flag,
            &mut pwt.delta_luma_weight_l0,
            &mut pwt.luma_offset_l0,
            &mut pwt.delta_chroma_weight_l0,
            &mut pwt.delta_chroma_offset_l0,
        )?;

        if slice_type == SliceType::B {
            Self::parse_list(
                reader,
                chroma_array_type,
                num_ref_idx_l1_active_minus1,
                &mut pwt.luma_weight_l1_flag,
                &mut pwt.chroma_weight_l1_flag,
                &mut pwt.delta_luma_weight_l1,
                &mut pwt.luma_offset_l1,
                &mut pwt.delta_chroma_weight_l1,
                &mut pwt.delta_chroma_offset_l1,
            )?;
        }

        Ok(pwt)
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_list(
        reader: &mut BitReader,
        chroma_array_type: u32,
        num_ref_idx_active_minus1: u32,
        luma_weight_flag: &mut Vec<bool>,
        chroma_weight_flag: &mut Vec<bool>,
        delta_luma_weight: &mut Vec<i32>,
        luma_offset: &mut Vec<i32>,
        delta_chroma_weight: &mut Vec<[i32; 2]>,
        delta_chroma_offset: &mut Vec<[i32; 2]>,
    ) -> Result<()> {
        for _ in 0..=num_ref_idx_active_minus1 {
            luma_weight_flag.push(reader.read_flag()?);
        }
        if chroma_array_type != 0 {
            for _ in 0..=num_ref_idx_active_minus1 {
                chroma_weight_flag.push(reader.read_flag()?);
            }
        }

        for i in 0..=num_ref_idx_active_minus1 as usize {
            if luma_weight_flag[i] {
                delta_luma_weight.push(read_se(reader)?);
                luma_offset.push(read_se(reader)?);
            } else {
                delta_luma_weight.push(0);
                luma_offset.push(0);
            }

            if chroma_array_type != 0 && chroma_weight_flag[i] {
                let mut weights = [0i32; 2];
                let mut offsets = [0i32; 2];
                for j in 0..2 {
                    weights[j] = read_se(reader)?;
                    offsets[j] = read_se(reader)?;
                }
                delta_chroma_weight.push(weights);
                delta_chroma_offset.push(offsets);
            } else {
                delta_chroma_weight.push([0, 0]);
                delta_chroma_offset.push([0, 0]);
            }
        }

        Ok(())
    }
}

/// slice_segment_header() syntax (7.3.6.1). Parses the header only; the
/// entropy-coded slice segment data after byte alignment is not touched.
#[derive(Debug, Clone)]
pub struct SliceSegmentHeader {
    pub first_slice_segment_in_pic_flag: bool,
    pub no_output_of_prior_pics_flag: bool,
    pub slice_pic_parameter_set_id: u32,
    pub dependent_slice_segment_flag: bool,
    pub slice_segment_address: u32,
    pub slice_type: SliceType,
    pub pic_output_flag: bool,
    pub colour_plane_id: u8,
    pub slice_pic_order_cnt_lsb: u32,
    pub short_term_ref_pic_set_sps_flag: bool,
    pub short_term_ref_pic_set: Option<ShortTermRefPicSet>,
    pub short_term_ref_pic_set_idx: u32,
    pub num_long_term_sps: u32,
    pub num_long_term_pics: u32,
    pub lt_idx_sps: Vec<u32>,
    pub poc_lsb_lt: Vec<u32>,
    pub used_by_curr_pic_lt_flag: Vec<bool>,
    pub delta_poc_msb_present_flag: Vec<bool>,
    pub delta_poc_msb_cycle_lt: Vec<u32>,
    pub slice_temporal_mvp_enabled_flag: bool,
    pub slice_sao_luma_flag: bool,
    pub slice_sao_chroma_flag: bool,
    pub num_ref_idx_active_override_flag: bool,
    pub num_ref_idx_l0_active_minus1: u32,
    pub num_ref_idx_l1_active_minus1: u32,
    pub ref_pic_lists_modification: Option<RefPicListsModification>,
    pub mvd_l1_zero_flag: bool,
    pub cabac_init_flag: bool,
    pub collocated_from_l0_flag: bool,
    pub collocated_ref_idx: u32,
    pub pred_weight_table: Option<PredWeightTable>,
    pub five_minus_max_num_merge_cand: u32,
    pub use_integer_mv_flag: bool,
    pub slice_qp_delta: i32,
    pub slice_cb_qp_offset: i32,
    pub slice_cr_qp_offset: i32,
    pub slice_act_y_qp_offset: i32,
    pub slice_act_cb_qp_offset: i32,
    pub slice_act_cr_qp_offset: i32,
    pub cu_chroma_qp_offset_enabled_flag: bool,
    pub deblocking_filter_override_flag: bool,
    pub slice_deblocking_filter_disabled_flag: bool,
    pub slice_beta_offset_div2: i32,
    pub slice_tc_offset_div2: i32,
    pub slice_loop_filter_across_slices_enabled_flag: bool,
    pub num_entry_point_offsets: u32,
    pub offset_len_minus1: u32,
    pub entry_point_offset_minus1: Vec<u32>,
}

impl SliceSegmentHeader {
    pub fn parse(rbsp: &[u8], nal_unit_type: NalUnitType, sps: &Sps, pps: &Pps) -> Result<Self> {
        let mut reader = BitReader::new(rbsp);
        Self::parse_bits(&mut reader, nal_unit_type, sps, pps)
    }

    pub fn parse_bits(
        reader: &mut BitReader,
        nal_unit_type: NalUnitType,
        sps: &Sps,
        pps: &Pps,
    ) -> Result<Self> {
        let mut header = SliceSegmentHeader {
            first_slice_segment_in_pic_flag: false,
            no_output_of_prior_pics_flag: false,
            slice_pic_parameter_set_id: 0,
            dependent_slice_segment_flag: false,
            slice_segment_address: 0,
            slice_type: SliceType::I,
            pic_output_flag: true,
            colour_plane_id: 0,
            slice_pic_order_cnt_lsb: 0,
            short_term_ref_pic_set_sps_flag: false,
            short_term_ref_pic_set: None,
            short_term_ref_pic_set_idx: 0,
            num_long_term_sps: 0,
            num_long_term_pics: 0,
            lt_idx_sps: Vec::new(),
            poc_lsb_lt: Vec::new(),
            used_by_curr_pic_lt_flag: Vec::new(),
            delta_poc_msb_present_flag: Vec::new(),
            delta_poc_msb_cycle_lt: Vec::new(),
            slice_temporal_mvp_enabled_flag: false,
            slice_sao_luma_flag: false,
            slice_sao_chroma_flag: false,
            num_ref_idx_active_override_flag: false,
            num_ref_idx_l0_active_minus1: pps.num_ref_idx_l0_default_active_minus1,
            num_ref_idx_l1_active_minus1: pps.num_ref_idx_l1_default_active_minus1,
            ref_pic_lists_modification: None,
            mvd_l1_zero_flag: false,
            cabac_init_flag: false,
            collocated_from_l0_flag: true,
            collocated_ref_idx: 0,
            pred_weight_table: None,
            five_minus_max_num_merge_cand: 0,
            use_integer_mv_flag: false,
            slice_qp_delta: 0,
            slice_cb_qp_offset: 0,
            slice_cr_qp_offset: 0,
            slice_act_y_qp_offset: 0,
            slice_act_cb_qp_offset: 0,
            slice_act_cr_qp_offset: 0,
            cu_chroma_qp_offset_enabled_flag: false,
            deblocking_filter_override_flag: false,
            slice_deblocking_filter_disabled_flag: pps.pps_deblocking_filter_disabled_flag,
            slice_beta_offset_div2: pps.pps_beta_offset_div2,
            slice_tc_offset_div2: pps.pps_tc_offset_div2,
            slice_loop_filter_across_slices_enabled_flag: pps
                .pps_loop_filter_across_slices_enabled_flag,
            num_entry_point_offsets: 0,
            offset_len_minus1: 0,
            entry_point_offset_minus1: Vec::new(),
        };

        header.first_slice_segment_in_pic_flag = reader.read_flag()?;

        if nal_unit_type.is_irap() {
            header.no_output_of_prior_pics_flag = reader.read_flag()?;
        }

        header.slice_pic_parameter_set_id = read_ue(reader)?;
        range_check(
            "slice_pic_parameter_set_id",
            header.slice_pic_parameter_set_id as i64,
            0,
            63,
        )?;

        if !header.first_slice_segment_in_pic_flag {
            if pps.dependent_slice_segments_enabled_flag {
                header.dependent_slice_segment_flag = reader.read_flag()?;
            }
            let address_bits = ceil_log2(pic_size_in_ctbs_y(sps));
            header.slice_segment_address = reader.read_bits(address_bits)?;
        }

        if !header.dependent_slice_segment_flag {
            Self::parse_independent_fields(reader, nal_unit_type, sps, pps, &mut header)?;
        }

        if pps.tiles_enabled_flag || pps.entropy_coding_sync_enabled_flag {
            header.num_entry_point_offsets = read_ue(reader)?;
            if header.num_entry_point_offsets > 0 {
                header.offset_len_minus1 = read_ue(reader)?;
                range_check("offset_len_minus1", header.offset_len_minus1 as i64, 0, 31)?;
                for _ in 0..header.num_entry_point_offsets {
                    header
                        .entry_point_offset_minus1
                        .push(reader.read_bits(header.offset_len_minus1 + 1)?);
                }
            }
        }

        if pps.slice_segment_header_extension_present_flag {
            let slice_segment_header_extension_length = read_ue(reader)?;
            range_check(
                "slice_segment_header_extension_length",
                slice_segment_header_extension_length as i64,
                0,
                256,
            )?;
            for _ in 0..slice_segment_header_extension_length {
                reader.read_u8()?; // slice_segment_header_extension_data_byte
            }
        }

        // byte_alignment()
        reader.rbsp_trailing_bits()?;

        Ok(header)
    }

    fn parse_independent_fields(
        reader: &mut BitReader,
        nal_unit_type: NalUnitType,
        sps: &Sps,
        pps: &Pps,
        header: &mut SliceSegmentHeader,
    ) -> Result<()> {
        for _ in 0..pps.num_extra_slice_header_bits {
            reader.read_flag()?; // slice_reserved_flag
        }

        let slice_type_value = read_ue(reader)?;
        header.slice_type = SliceType::from_value(slice_type_value).ok_or({
            Error::SyntaxViolation {
                field: "slice_type",
                value: slice_type_value as i64,
                min: 0,
                max: 2,
            }
        })?;

        if pps.output_flag_present_flag {
            header.pic_output_flag = reader.read_flag()?;
        }

        if sps.separate_colour_plane_flag {
            header.colour_plane_id = reader.read_bits(2)? as u8;
        }

        if !nal_unit_type.is_idr() {
            let poc_lsb_bits = sps.log2_max_pic_order_cnt_lsb_minus4 + 4;
            header.slice_pic_order_cnt_lsb = reader.read_bits(poc_lsb_bits)?;

            header.short_term_ref_pic_set_sps_flag = reader.read_flag()?;
            if !header.short_term_ref_pic_set_sps_flag {
                let rps = ShortTermRefPicSet::parse(
                    reader,
                    sps.num_short_term_ref_pic_sets,
                    sps.num_short_term_ref_pic_sets,
                    &sps.short_term_ref_pic_sets,
                    sps.max_num_pics(),
                )?;
                header.short_term_ref_pic_set = Some(rps);
            } else if sps.num_short_term_ref_pic_sets > 1 {
                let idx_bits = ceil_log2(sps.num_short_term_ref_pic_sets);
                header.short_term_ref_pic_set_idx = reader.read_bits(idx_bits)?;
                range_check(
                    "short_term_ref_pic_set_idx",
                    header.short_term_ref_pic_set_idx as i64,
                    0,
                    sps.num_short_term_ref_pic_sets as i64 - 1,
                )?;
            }

            if sps.long_term_ref_pics_present_flag {
                if sps.num_long_term_ref_pics_sps > 0 {
                    header.num_long_term_sps = read_ue(reader)?;
                    range_check(
                        "num_long_term_sps",
                        header.num_long_term_sps as i64,
                        0,
                        sps.num_long_term_ref_pics_sps as i64,
                    )?;
                }
                header.num_long_term_pics = read_ue(reader)?;

                let num_long_term = header.num_long_term_sps + header.num_long_term_pics;
                let poc_lsb_bits = sps.log2_max_pic_order_cnt_lsb_minus4 + 4;
                for i in 0..num_long_term {
                    if i < header.num_long_term_sps {
                        let mut lt_idx = 0;
                        if sps.num_long_term_ref_pics_sps > 1 {
                            let idx_bits = ceil_log2(sps.num_long_term_ref_pics_sps);
                            lt_idx = reader.read_bits(idx_bits)?;
                        }
                        header.lt_idx_sps.push(lt_idx);
                    } else {
                        header.poc_lsb_lt.push(reader.read_bits(poc_lsb_bits)?);
                        header.used_by_curr_pic_lt_flag.push(reader.read_flag()?);
                    }
                    let msb_present = reader.read_flag()?;
                    header.delta_poc_msb_present_flag.push(msb_present);
                    let cycle = if msb_present { read_ue(reader)? } else { 0 };
                    header.delta_poc_msb_cycle_lt.push(cycle);
                }
            }

            if sps.sps_temporal_mvp_enabled_flag {
                header.slice_temporal_mvp_enabled_flag = reader.read_flag()?;
            }
        }

        if sps.sample_adaptive_offset_enabled_flag {
            header.slice_sao_luma_flag = reader.read_flag()?;
            if sps.chroma_array_type() != 0 {
                header.slice_sao_chroma_flag = reader.read_flag()?;
            }
        }

        if header.slice_type.is_inter() {
            header.num_ref_idx_active_override_flag = reader.read_flag()?;
            if header.num_ref_idx_active_override_flag {
                header.num_ref_idx_l0_active_minus1 = read_ue(reader)?;
                range_check(
                    "num_ref_idx_l0_active_minus1",
                    header.num_ref_idx_l0_active_minus1 as i64,
                    0,
                    14,
                )?;
                if header.slice_type == SliceType::B {
                    header.num_ref_idx_l1_active_minus1 = read_ue(reader)?;
                    range_check(
                        "num_ref_idx_l1_active_minus1",
                        header.num_ref_idx_l1_active_minus1 as i64,
                        0,
                        14,
                    )?;
                }
            }

            let num_pic_total_curr = header.num_pic_total_curr(sps, pps);
            if pps.lists_modification_present_flag && num_pic_total_curr > 1 {
                header.ref_pic_lists_modification = Some(RefPicListsModification::parse(
                    reader,
                    header.slice_type,
                    header.num_ref_idx_l0_active_minus1,
                    header.num_ref_idx_l1_active_minus1,
                    num_pic_total_curr,
                )?);
            }

            if header.slice_type == SliceType::B {
                header.mvd_l1_zero_flag = reader.read_flag()?;
            }
            if pps.cabac_init_present_flag {
                header.cabac_init_flag = reader.read_flag()?;
            }

            if header.slice_temporal_mvp_enabled_flag {
                if header.slice_type == SliceType::B {
                    header.collocated_from_l0_flag = reader.read_flag()?;
                }
                if (header.collocated_from_l0_flag && header.num_ref_idx_l0_active_minus1 > 0)
                    || (!header.collocated_from_l0_flag
                        && header.num_ref_idx_l1_active_minus1 > 0)
                {
                    header.collocated_ref_idx = read_ue(reader)?;
                }
            }

            if (pps.weighted_pred_flag && header.slice_type == SliceType::P)
                || (pps.weighted_bipred_flag && header.slice_type == SliceType::B)
            {
                header.pred_weight_table = Some(PredWeightTable::parse(
                    reader,
                    header.slice_type,
                    sps.chroma_array_type(),
                    header.num_ref_idx_l0_active_minus1,
                    header.num_ref_idx_l1_active_minus1,
                )?);
            }

            header.five_minus_max_num_merge_cand = read_ue(reader)?;
            range_check(
                "five_minus_max_num_merge_cand",
                header.five_minus_max_num_merge_cand as i64,
                0,
                4,
            )?;

            let mv_resolution_idc = sps
                .scc_extension
                .as_ref()
                .map(|scc| scc.motion_vector_resolution_control_idc)
                .unwrap_or(0);
            if mv_resolution_idc == 2 {
                header.use_integer_mv_flag = reader.read_flag()?;
            }
        }

        header.slice_qp_delta = read_se(reader)?;

        if pps.pps_slice_chroma_qp_offsets_present_flag {
            header.slice_cb_qp_offset = read_se(reader)?;
            range_check("slice_cb_qp_offset", header.slice_cb_qp_offset as i64, -12, 12)?;
            header.slice_cr_qp_offset = read_se(reader)?;
            range_check("slice_cr_qp_offset", header.slice_cr_qp_offset as i64, -12, 12)?;
        }

        let act_offsets_present = pps
            .scc_extension
            .as_ref()
            .map(|scc| scc.pps_slice_act_qp_offsets_present_flag)
            .unwrap_or(false);
        if act_offsets_present {
            header.slice_act_y_qp_offset = read_se(reader)?;
            header.slice_act_cb_qp_offset = read_se(reader)?;
            header.slice_act_cr_qp_offset = read_se(reader)?;
        }

        let chroma_qp_offset_list_enabled = pps
            .range_extension
            .as_ref()
            .map(|ext| ext.chroma_qp_offset_list_enabled_flag)
            .unwrap_or(false);
        if chroma_qp_offset_list_enabled {
            header.cu_chroma_qp_offset_enabled_flag = reader.read_flag()?;
        }

        if pps.deblocking_filter_override_enabled_flag {
            header.deblocking_filter_override_flag = reader.read_flag()?;
        }
        if header.deblocking_filter_override_flag {
            header.slice_deblocking_filter_disabled_flag = reader.read_flag()?;
            if !header.slice_deblocking_filter_disabled_flag {
                header.slice_beta_offset_div2 = read_se(reader)?;
                range_check(
                    "slice_beta_offset_div2",
                    header.slice_beta_offset_div2 as i64,
                    -6,
                    6,
                )?;
                header.slice_tc_offset_div2 = read_se(reader)?;
                range_check("slice_tc_offset_div2", header.slice_tc_offset_div2 as i64, -6, 6)?;
            }
        }

        if pps.pps_loop_filter_across_slices_enabled_flag
            && (header.slice_sao_luma_flag
                || header.slice_sao_chroma_flag
                || !header.slice_deblocking_filter_disabled_flag)
        {
            header.slice_loop_filter_across_slices_enabled_flag = reader.read_flag()?;
        }

        Ok(())
    }

    /// NumPicTotalCurr (7-57), from the RPS selected by this slice plus
    /// the long-term pictures marked used.
    fn num_pic_total_curr(&self, sps: &Sps, pps: &Pps) -> u32 {
        let mut total = 0;

        let curr_rps = if let Some(ref rps) = self.short_term_ref_pic_set {
            Some(rps)
        } else if self.short_term_ref_pic_set_sps_flag {
            sps.short_term_ref_pic_sets
                .get(self.short_term_ref_pic_set_idx as usize)
        } else {
            None
        };

        if let Some(rps) = curr_rps {
            total += rps.used_by_curr_pic_s0.iter().filter(|&&u| u).count() as u32;
            total += rps.used_by_curr_pic_s1.iter().filter(|&&u| u).count() as u32;
        }

        let num_long_term = self.num_long_term_sps + self.num_long_term_pics;
        for i in 0..num_long_term as usize {
            let used = if i < self.num_long_term_sps as usize {
                self.lt_idx_sps
                    .get(i)
                    .and_then(|&idx| sps.used_by_curr_pic_lt_sps_flag.get(idx as usize))
                    .copied()
                    .unwrap_or(false)
            } else {
                self.used_by_curr_pic_lt_flag
                    .get(i - self.num_long_term_sps as usize)
                    .copied()
                    .unwrap_or(false)
            };
            if used {
                total += 1;
            }
        }

        let curr_pic_ref = pps
            .scc_extension
            .as_ref()
            .map(|scc| scc.pps_curr_pic_ref_enabled_flag)
            .unwrap_or(false);
        if curr_pic_ref {
            total += 1;
        }

        total
    }
}

/// PicSizeInCtbsY (7-10..7-17).
fn pic_size_in_ctbs_y(sps: &Sps) -> u32 {
    let ctb_log2_size =
        sps.log2_min_luma_coding_block_size_minus3 + 3 + sps.log2_diff_max_min_luma_coding_block_size;
    let ctb_size = 1u32 << ctb_log2_size;
    let width_in_ctbs = sps.pic_width_in_luma_samples.div_ceil(ctb_size);
    let height_in_ctbs = sps.pic_height_in_luma_samples.div_ceil(ctb_size);
    width_in_ctbs * height_in_ctbs
}

fn ceil_log2(n: u32) -> u32 {
    if n <= 1 {
        0
    } else {
        32 - (n - 1).leading_zeros()
    }
}
