//! Bit-level writer and NAL fixtures for building syntax in unit tests.

use crate::nal::rbsp_to_ebsp;

/// VPS NAL unit (header + EBSP) from a camera capture.
pub(crate) fn camera_vps_nal() -> Vec<u8> {
    vec![
        0x40, 0x01, 0x0c, 0x01, 0xff, 0xff, 0x01, 0x60, 0x00, 0x00, 0x03, 0x00, 0xb0, 0x00, 0x00,
        0x03, 0x00, 0x00, 0x03, 0x00, 0x00, 0x99, 0x98, 0x09,
    ]
}

/// SPS NAL unit (header + EBSP) from the same capture, 2560x1440.
pub(crate) fn camera_sps_nal() -> Vec<u8> {
    vec![
        0x42, 0x01, 0x01, 0x01, 0x60, 0x00, 0x00, 0x03, 0x00, 0xb0, 0x00, 0x00, 0x03, 0x00, 0x00,
        0x03, 0x00, 0x99, 0xa0, 0x01, 0x40, 0x20, 0x05, 0xa1, 0xfe, 0x5a, 0xee, 0x46, 0xc1, 0xae,
        0x55, 0x04,
    ]
}

/// Minimal PPS NAL unit with the given ids and init_qp_minus26.
pub(crate) fn minimal_pps_nal(pps_id: u32, sps_id: u32, init_qp_minus26: i32) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.ue(pps_id);
    w.ue(sps_id);
    w.write_flag(false); // dependent_slice_segments_enabled_flag
    w.write_flag(false); // output_flag_present_flag
    w.write_bits(3, 0); // num_extra_slice_header_bits
    w.write_flag(false); // sign_data_hiding_enabled_flag
    w.write_flag(false); // cabac_init_present_flag
    w.ue(0); // num_ref_idx_l0_default_active_minus1
    w.ue(0); // num_ref_idx_l1_default_active_minus1
    w.se(init_qp_minus26);
    w.write_flag(false); // constrained_intra_pred_flag
    w.write_flag(false); // transform_skip_enabled_flag
    w.write_flag(false); // cu_qp_delta_enabled_flag
    w.se(0); // pps_cb_qp_offset
    w.se(0); // pps_cr_qp_offset
    w.write_flag(false); // pps_slice_chroma_qp_offsets_present_flag
    w.write_flag(false); // weighted_pred_flag
    w.write_flag(false); // weighted_bipred_flag
    w.write_flag(false); // transquant_bypass_enabled_flag
    w.write_flag(false); // tiles_enabled_flag
    w.write_flag(false); // entropy_coding_sync_enabled_flag
    w.write_flag(true); // pps_loop_filter_across_slices_enabled_flag
    w.write_flag(false); // deblocking_filter_control_present_flag
    w.write_flag(false); // pps_scaling_list_data_present_flag
    w.write_flag(false); // lists_modification_present_flag
    w.ue(0); // log2_parallel_merge_level_minus2
    w.write_flag(false); // slice_segment_header_extension_present_flag
    w.write_flag(false); // pps_extension_present_flag
    let mut nal = vec![0x44, 0x01];
    nal.extend_from_slice(&rbsp_to_ebsp(&w.finish_trailing_bits()));
    nal
}

/// IDR slice NAL unit (IDR_W_RADL) referencing `pps_id`, with only the
/// mandatory header fields and the given slice_qp_delta.
pub(crate) fn idr_slice_nal(pps_id: u32, slice_qp_delta: i32) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_flag(true); // first_slice_segment_in_pic_flag
    w.write_flag(false); // no_output_of_prior_pics_flag
    w.ue(pps_id); // slice_pic_parameter_set_id
    w.ue(2); // slice_type = I
    w.se(slice_qp_delta);
    w.write_flag(true); // slice_loop_filter_across_slices_enabled_flag
    let mut nal = vec![0x26, 0x01]; // type 19 (IDR_W_RADL)
    nal.extend_from_slice(&rbsp_to_ebsp(&w.finish_trailing_bits()));
    nal
}

/// Prefixes a NAL unit with a four-byte start code.
pub(crate) fn annexb_nal(nal: &[u8]) -> Vec<u8> {
    let mut out = vec![0x00, 0x00, 0x00, 0x01];
    out.extend_from_slice(nal);
    out
}

pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    nbits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            cur: 0,
            nbits: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.cur <<= 1;
        if bit {
            self.cur |= 1;
        }
        self.nbits += 1;
        if self.nbits == 8 {
            self.bytes.push(self.cur);
            self.cur = 0;
            self.nbits = 0;
        }
    }

    pub fn write_flag(&mut self, b: bool) {
        self.write_bit(b);
    }

    pub fn write_bits(&mut self, n: u32, val: u32) {
        for i in (0..n).rev() {
            self.write_bit((val >> i) & 1 != 0);
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write_bits(8, v as u32);
    }

    pub fn ue(&mut self, v: u32) {
        let code_num = v as u64 + 1;
        let bits = 64 - code_num.leading_zeros();
        for _ in 0..bits - 1 {
            self.write_bit(false);
        }
        for i in (0..bits).rev() {
            self.write_bit((code_num >> i) & 1 != 0);
        }
    }

    pub fn se(&mut self, v: i32) {
        let code_num = if v > 0 {
            (v as u32) * 2 - 1
        } else {
            (-(v as i64) as u32) * 2
        };
        self.ue(code_num);
    }

    /// Zero-pads to a byte boundary.
    pub fn finish(mut self) -> Vec<u8> {
        while self.nbits != 0 {
            self.write_bit(false);
        }
        self.bytes
    }

    /// Appends rbsp_trailing_bits(): a 1 bit then zero padding.
    pub fn finish_trailing_bits(mut self) -> Vec<u8> {
        self.write_bit(true);
        while self.nbits != 0 {
            self.write_bit(false);
        }
        self.bytes
    }
}
