use hex_literal::hex;

use h265_parser::bitreader::BitReader;
use h265_parser::nal::{ebsp_to_rbsp, rbsp_to_ebsp};
use h265_parser::rps::ShortTermRefPicSet;
use h265_parser::sps_ext::SpsSccExtension;
use h265_parser::{
    find_nalu_indices, get_slice_qp_y, BitstreamParser, NalUnitPayload, NalUnitType, ParserState,
};

// VPS and SPS NAL units from a 2560x1440 camera capture, start codes not
// included.
const VPS_NAL: [u8; 24] = hex!(
    "4001 0c01ffff01 6000000300 b000000300 0003000099 9809"
);
const SPS_NAL: [u8; 32] = hex!(
    "4201 0101600000 0300b00000 0300000300 99a0014020 05a1fe5aee 46c1ae5504"
);

fn annexb(nals: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    for nal in nals {
        out.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
        out.extend_from_slice(nal);
    }
    out
}

/* -----------------------------
   Minimal RBSP bit writer
   ----------------------------- */

struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    nbits: u8,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            cur: 0,
            nbits: 0,
        }
    }

    fn write_bit(&mut self, bit: bool) {
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

    fn write_flag(&mut self, b: bool) {
        self.write_bit(b);
    }

    fn write_bits(&mut self, n: u32, val: u32) {
        for i in (0..n).rev() {
            self.write_bit((val >> i) & 1 != 0);
        }
    }

    fn ue(&mut self, v: u32) {
        let code_num = v as u64 + 1;
        let bits = 64 - code_num.leading_zeros();
        for _ in 0..bits - 1 {
            self.write_bit(false);
        }
        for i in (0..bits).rev() {
            self.write_bit((code_num >> i) & 1 != 0);
        }
    }

    fn se(&mut self, v: i32) {
        let code_num = if v > 0 {
            (v as u32) * 2 - 1
        } else {
            (-(v as i64) as u32) * 2
        };
        self.ue(code_num);
    }

    fn finish(mut self) -> Vec<u8> {
        while self.nbits != 0 {
            self.write_bit(false);
        }
        self.bytes
    }

    fn finish_trailing_bits(mut self) -> Vec<u8> {
        self.write_bit(true);
        while self.nbits != 0 {
            self.write_bit(false);
        }
        self.bytes
    }
}

fn build_pps_nal(pps_id: u32, sps_id: u32, init_qp_minus26: i32) -> Vec<u8> {
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

fn build_idr_slice_nal(pps_id: u32, slice_qp_delta: i32) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_flag(true); // first_slice_segment_in_pic_flag
    w.write_flag(false); // no_output_of_prior_pics_flag
    w.ue(pps_id); // slice_pic_parameter_set_id
    w.ue(2); // slice_type = I
    w.se(slice_qp_delta);
    w.write_flag(true); // slice_loop_filter_across_slices_enabled_flag
    let mut nal = vec![0x26, 0x01]; // IDR_W_RADL
    nal.extend_from_slice(&rbsp_to_ebsp(&w.finish_trailing_bits()));
    nal
}

#[test]
fn test_vps_lands_in_parser_state() {
    let mut state = ParserState::new();
    let results = BitstreamParser::parse(&annexb(&[&VPS_NAL]), &mut state);

    assert_eq!(results.len(), 1);
    let nal = results[0].as_ref().unwrap();
    assert_eq!(nal.header.nal_unit_type, NalUnitType::Vps);

    let vps = state.get_vps(0).expect("VPS 0 in state");
    assert_eq!(vps.vps_video_parameter_set_id, 0);
}

#[test]
fn test_vps_sps_sequence() {
    let mut state = ParserState::new();
    let results = BitstreamParser::parse(&annexb(&[&VPS_NAL, &SPS_NAL]), &mut state);

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_ok()));
    assert!(state.get_vps(0).is_some());

    let sps = state.get_sps(0).expect("SPS 0 in state");
    assert_eq!(sps.chroma_format_idc, 1);
    assert_eq!(sps.pic_width_in_luma_samples, 2560);
    assert_eq!(sps.pic_height_in_luma_samples, 1440);
}

#[test]
fn test_qp_extraction_over_full_stream() {
    let mut state = ParserState::new();
    let pps = build_pps_nal(0, 0, 0);
    let slice = build_idr_slice_nal(0, -4);
    let data = annexb(&[&VPS_NAL, &SPS_NAL, &pps, &slice]);

    assert_eq!(get_slice_qp_y(&data, &mut state), vec![22]);
}

#[test]
fn test_missing_pps_skips_slice_only() {
    let mut state = ParserState::new();
    let pps = build_pps_nal(0, 0, 0);
    let orphan = build_idr_slice_nal(7, -4); // PPS 7 never sent
    let slice = build_idr_slice_nal(0, 4);
    let data = annexb(&[&VPS_NAL, &SPS_NAL, &pps, &orphan, &slice]);

    assert_eq!(get_slice_qp_y(&data, &mut state), vec![30]);

    // The orphan slice is reported as an error, everything else parses.
    let mut state = ParserState::new();
    let results = BitstreamParser::parse(&data, &mut state);
    assert_eq!(results.len(), 5);
    assert!(results[3].is_err());
    assert!(results.iter().enumerate().all(|(i, r)| i == 3 || r.is_ok()));
}

#[test]
fn test_rbsp_round_trip_restores_zero_run() {
    // 00 00 03 00 in the middle decodes back to 00 00 00, one byte
    // shorter.
    let ebsp = hex!("aa00000300bb");
    let rbsp = ebsp_to_rbsp(&ebsp);
    assert_eq!(rbsp, hex!("aa000000bb"));
    assert_eq!(rbsp.len(), ebsp.len() - 1);
    assert_eq!(rbsp_to_ebsp(&rbsp), ebsp);
}

#[test]
fn test_rps_predicted_from_earlier_entry() {
    // Two direct sets, then a slice-level set at stRpsIdx 2 predicting
    // from entry 0 via delta_idx_minus1 = 1.
    let mut prior = Vec::new();
    for idx in 0..2u32 {
        let mut w = BitWriter::new();
        if idx != 0 {
            w.write_flag(false); // inter_ref_pic_set_prediction_flag
        }
        w.ue(1); // num_negative_pics
        w.ue(0); // num_positive_pics
        w.ue(0); // delta_poc_s0_minus1[0]
        w.write_flag(true); // used_by_curr_pic_s0_flag[0]
        let data = w.finish();
        let mut reader = BitReader::new(&data);
        let rps = ShortTermRefPicSet::parse(&mut reader, idx, 2, &prior, 8).unwrap();
        prior.push(rps);
    }

    let mut w = BitWriter::new();
    w.write_flag(true); // inter_ref_pic_set_prediction_flag
    w.ue(1); // delta_idx_minus1 -> RefRpsIdx 0
    w.write_flag(false); // delta_rps_sign
    w.ue(1); // abs_delta_rps_minus1 -> deltaRps = +2
    w.write_flag(true); // used_by_curr_pic_flag[0]
    w.write_flag(true); // used_by_curr_pic_flag[1]
    let data = w.finish();
    let mut reader = BitReader::new(&data);
    let rps = ShortTermRefPicSet::parse(&mut reader, 2, 2, &prior, 8).unwrap();

    // Entry 0 holds DeltaPoc -1; shifted by +2 it lands at +1, and the
    // deltaRps itself contributes +2.
    assert_eq!(rps.num_negative_pics, 0);
    assert_eq!(rps.delta_poc_s1, vec![1, 2]);
    assert_eq!(rps.num_positive_pics, 2);
}

#[test]
fn test_rps_abs_delta_rps_bounds() {
    let mut w = BitWriter::new();
    w.ue(1);
    w.ue(0);
    w.ue(0);
    w.write_flag(true);
    let data = w.finish();
    let mut reader = BitReader::new(&data);
    let prior = vec![ShortTermRefPicSet::parse(&mut reader, 0, 2, &[], 8).unwrap()];

    for (value, ok) in [(32767u32, true), (32768, false)] {
        let mut w = BitWriter::new();
        w.write_flag(true); // inter_ref_pic_set_prediction_flag
        w.write_flag(false); // delta_rps_sign
        w.ue(value); // abs_delta_rps_minus1
        w.write_flag(true);
        w.write_flag(true);
        let data = w.finish();
        let mut reader = BitReader::new(&data);
        let result = ShortTermRefPicSet::parse(&mut reader, 1, 2, &prior, 8);
        assert_eq!(result.is_ok(), ok, "abs_delta_rps_minus1 = {value}");
    }
}

#[test]
fn test_scc_palette_bounds() {
    let build = |palette_max_size: u32, delta_predictor: u32| {
        let mut w = BitWriter::new();
        w.write_flag(false); // sps_curr_pic_ref_enabled_flag
        w.write_flag(true); // palette_mode_enabled_flag
        w.ue(palette_max_size);
        w.ue(delta_predictor);
        w.write_flag(false); // sps_palette_predictor_initializers_present_flag
        w.write_bits(2, 0); // motion_vector_resolution_control_idc
        w.write_flag(false); // intra_boundary_filtering_disabled_flag
        w.finish()
    };

    let data = build(64, 128);
    let mut reader = BitReader::new(&data);
    assert!(SpsSccExtension::parse(&mut reader, 1, 0, 0).is_ok());

    let data = build(65, 128);
    let mut reader = BitReader::new(&data);
    assert!(SpsSccExtension::parse(&mut reader, 1, 0, 0).is_err());

    let data = build(64, 129);
    let mut reader = BitReader::new(&data);
    assert!(SpsSccExtension::parse(&mut reader, 1, 0, 0).is_err());
}

#[test]
fn test_empty_input() {
    let mut state = ParserState::new();
    assert!(BitstreamParser::parse(&[], &mut state).is_empty());
    assert!(find_nalu_indices(&[]).is_empty());
}

#[test]
fn test_start_code_and_header_only() {
    // End-of-sequence NAL: just a start code and the two header bytes.
    let mut state = ParserState::new();
    let data = [0x00, 0x00, 0x01, 0x48, 0x01];

    let results = BitstreamParser::parse(&data, &mut state);
    assert_eq!(results.len(), 1);
    let nal = results[0].as_ref().unwrap();
    assert_eq!(nal.header.nal_unit_type, NalUnitType::EndOfSeq);
    assert!(matches!(nal.payload, NalUnitPayload::EndOfSeq));
    assert_eq!(nal.span.payload_size, 2);
}

#[test]
fn test_truncated_nal_recorded_and_stream_continues() {
    let mut state = ParserState::new();
    let truncated = &SPS_NAL[..10];
    let data = annexb(&[truncated, &VPS_NAL]);

    let results = BitstreamParser::parse(&data, &mut state);
    assert_eq!(results.len(), 2);
    assert!(results[0].is_err());
    assert!(results[1].is_ok());
    assert!(state.get_sps(0).is_none());
    assert!(state.get_vps(0).is_some());
}
