// tests/proptests.rs

use proptest::prelude::*;

use h265_parser::nal::{ebsp_to_rbsp, rbsp_to_ebsp};
use h265_parser::{find_nalu_indices, get_slice_qp_y, BitstreamParser, ParserState};

const VPS_NAL: &[u8] = &[
    0x40, 0x01, 0x0c, 0x01, 0xff, 0xff, 0x01, 0x60, 0x00, 0x00, 0x03, 0x00, 0xb0, 0x00, 0x00,
    0x03, 0x00, 0x00, 0x03, 0x00, 0x00, 0x99, 0x98, 0x09,
];
const SPS_NAL: &[u8] = &[
    0x42, 0x01, 0x01, 0x01, 0x60, 0x00, 0x00, 0x03, 0x00, 0xb0, 0x00, 0x00, 0x03, 0x00, 0x00,
    0x03, 0x00, 0x99, 0xa0, 0x01, 0x40, 0x20, 0x05, 0xa1, 0xfe, 0x5a, 0xee, 0x46, 0xc1, 0xae,
    0x55, 0x04,
];

fn push_start_code(dst: &mut Vec<u8>, four_byte: bool) {
    if four_byte {
        dst.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
    } else {
        dst.extend_from_slice(&[0x00, 0x00, 0x01]);
    }
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

/// Minimal Main-profile SPS: 64x64, 4:2:0, no extensions.
fn build_sps_nal(sps_id: u32, width: u32, height: u32) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_bits(4, 0); // sps_video_parameter_set_id
    w.write_bits(3, 0); // sps_max_sub_layers_minus1
    w.write_flag(true); // sps_temporal_id_nesting_flag
    // profile_tier_level(1, 0)
    w.write_bits(2, 0); // general_profile_space
    w.write_flag(false); // general_tier_flag
    w.write_bits(5, 1); // general_profile_idc
    w.write_bits(32, 0x60000000); // general_profile_compatibility_flags
    w.write_flag(true); // general_progressive_source_flag
    w.write_flag(false); // general_interlaced_source_flag
    w.write_flag(false); // general_non_packed_constraint_flag
    w.write_flag(true); // general_frame_only_constraint_flag
    w.write_bits(32, 0); // reserved
    w.write_bits(12, 0); // reserved + inbld
    w.write_bits(8, 93); // general_level_idc
    w.ue(sps_id); // sps_seq_parameter_set_id
    w.ue(1); // chroma_format_idc
    w.ue(width); // pic_width_in_luma_samples
    w.ue(height); // pic_height_in_luma_samples
    w.write_flag(false); // conformance_window_flag
    w.ue(0); // bit_depth_luma_minus8
    w.ue(0); // bit_depth_chroma_minus8
    w.ue(0); // log2_max_pic_order_cnt_lsb_minus4
    w.write_flag(true); // sps_sub_layer_ordering_info_present_flag
    w.ue(1); // sps_max_dec_pic_buffering_minus1[0]
    w.ue(0); // sps_max_num_reorder_pics[0]
    w.ue(0); // sps_max_latency_increase_plus1[0]
    w.ue(0); // log2_min_luma_coding_block_size_minus3
    w.ue(0); // log2_diff_max_min_luma_coding_block_size
    w.ue(0); // log2_min_luma_transform_block_size_minus2
    w.ue(0); // log2_diff_max_min_luma_transform_block_size
    w.ue(0); // max_transform_hierarchy_depth_inter
    w.ue(0); // max_transform_hierarchy_depth_intra
    w.write_flag(false); // scaling_list_enabled_flag
    w.write_flag(false); // amp_enabled_flag
    w.write_flag(false); // sample_adaptive_offset_enabled_flag
    w.write_flag(false); // pcm_enabled_flag
    w.ue(0); // num_short_term_ref_pic_sets
    w.write_flag(false); // long_term_ref_pics_present_flag
    w.write_flag(false); // sps_temporal_mvp_enabled_flag
    w.write_flag(false); // strong_intra_smoothing_enabled_flag
    w.write_flag(false); // vui_parameters_present_flag
    w.write_flag(false); // sps_extension_present_flag
    let mut nal = vec![0x42, 0x01];
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

/// -----------------------------------------------------------------
/// 1) Framing accounting: start codes plus payloads cover everything
///    after the leading garbage.
/// -----------------------------------------------------------------
proptest! {
    #[test]
    fn framing_accounts_for_every_byte(
        garbage in proptest::collection::vec(1u8..=255, 0..20),
        nals in proptest::collection::vec(
            (any::<bool>(), proptest::collection::vec(1u8..=255, 0..40)),
            1..8,
        ),
    ) {
        let mut stream = garbage.clone();
        for (four_byte, payload) in &nals {
            push_start_code(&mut stream, *four_byte);
            stream.extend_from_slice(payload);
        }

        let spans = find_nalu_indices(&stream);
        prop_assert_eq!(spans.len(), nals.len());
        prop_assert_eq!(spans[0].start_offset, garbage.len());

        let covered: usize = spans
            .iter()
            .map(|s| s.start_code_len() + s.payload_size)
            .sum();
        prop_assert_eq!(covered, stream.len() - garbage.len());
    }
}

/// ---------------------------------------------------------------
/// 2) RBSP extraction inverts emulation-prevention insertion.
/// ---------------------------------------------------------------
proptest! {
    #[test]
    fn rbsp_extract_inverts_insert(data in proptest::collection::vec(any::<u8>(), 0..200)) {
        let ebsp = rbsp_to_ebsp(&data);
        prop_assert_eq!(ebsp_to_rbsp(&ebsp), data);
    }
}

/// ----------------------------------------------------------------
/// 3) QP extraction returns one value per slice, matching Eq. 7-54.
/// ----------------------------------------------------------------
proptest! {
    #[test]
    fn qp_matches_equation(
        init_qp_minus26 in -10i32..=10,
        deltas in proptest::collection::vec(-8i32..=8, 1..6),
    ) {
        let mut stream = Vec::new();
        push_start_code(&mut stream, true);
        stream.extend_from_slice(VPS_NAL);
        push_start_code(&mut stream, true);
        stream.extend_from_slice(SPS_NAL);
        push_start_code(&mut stream, true);
        stream.extend_from_slice(&build_pps_nal(0, 0, init_qp_minus26));
        for &delta in &deltas {
            push_start_code(&mut stream, true);
            stream.extend_from_slice(&build_idr_slice_nal(0, delta));
        }

        let mut state = ParserState::new();
        let qps = get_slice_qp_y(&stream, &mut state);

        let expected: Vec<i32> = deltas.iter().map(|d| 26 + init_qp_minus26 + d).collect();
        prop_assert_eq!(qps, expected);
    }
}

/// --------------------------------------------------------------
/// 4) Re-parsing the same parameter set leaves the state
///    indistinguishable.
/// --------------------------------------------------------------
#[test]
fn reparsing_parameter_set_is_idempotent() {
    let mut once = Vec::new();
    push_start_code(&mut once, true);
    once.extend_from_slice(SPS_NAL);

    let mut twice = once.clone();
    push_start_code(&mut twice, true);
    twice.extend_from_slice(SPS_NAL);

    let mut state_once = ParserState::new();
    BitstreamParser::parse(&once, &mut state_once);
    let mut state_twice = ParserState::new();
    BitstreamParser::parse(&twice, &mut state_twice);

    for id in 0..16 {
        match (state_once.get_sps(id), state_twice.get_sps(id)) {
            (Some(a), Some(b)) => {
                assert_eq!(a.pic_width_in_luma_samples, b.pic_width_in_luma_samples);
                assert_eq!(a.pic_height_in_luma_samples, b.pic_height_in_luma_samples);
                assert_eq!(a.chroma_format_idc, b.chroma_format_idc);
                assert_eq!(a.num_short_term_ref_pic_sets, b.num_short_term_ref_pic_sets);
            }
            (None, None) => {}
            _ => panic!("states diverge at SPS {id}"),
        }
    }
}

/// --------------------------------------------------------------
/// 5) Independent parameter sets commute.
/// --------------------------------------------------------------
proptest! {
    #[test]
    fn independent_pps_entries_commute(
        id_a in 0u32..32,
        id_b in 32u32..64,
        qp_a in -10i32..=10,
        qp_b in -10i32..=10,
    ) {
        let pps_a = build_pps_nal(id_a, 0, qp_a);
        let pps_b = build_pps_nal(id_b, 0, qp_b);

        let mut forward = Vec::new();
        push_start_code(&mut forward, true);
        forward.extend_from_slice(&pps_a);
        push_start_code(&mut forward, true);
        forward.extend_from_slice(&pps_b);

        let mut reverse = Vec::new();
        push_start_code(&mut reverse, true);
        reverse.extend_from_slice(&pps_b);
        push_start_code(&mut reverse, true);
        reverse.extend_from_slice(&pps_a);

        let mut state_fwd = ParserState::new();
        BitstreamParser::parse(&forward, &mut state_fwd);
        let mut state_rev = ParserState::new();
        BitstreamParser::parse(&reverse, &mut state_rev);

        for id in 0..64 {
            let fwd = state_fwd.get_pps(id).map(|p| p.init_qp_minus26);
            let rev = state_rev.get_pps(id).map(|p| p.init_qp_minus26);
            prop_assert_eq!(fwd, rev);
        }
    }
}

/// --------------------------------------------------------------
/// 6) Independent SPS entries with different ids commute too.
/// --------------------------------------------------------------
proptest! {
    #[test]
    fn independent_sps_entries_commute(
        id_a in 0u32..8,
        id_b in 8u32..16,
        dims in (1u32..=64, 1u32..=64),
    ) {
        let sps_a = build_sps_nal(id_a, dims.0 * 8, dims.1 * 8);
        let sps_b = build_sps_nal(id_b, 64, 64);

        let mut forward = Vec::new();
        push_start_code(&mut forward, true);
        forward.extend_from_slice(&sps_a);
        push_start_code(&mut forward, true);
        forward.extend_from_slice(&sps_b);

        let mut reverse = Vec::new();
        push_start_code(&mut reverse, true);
        reverse.extend_from_slice(&sps_b);
        push_start_code(&mut reverse, true);
        reverse.extend_from_slice(&sps_a);

        let mut state_fwd = ParserState::new();
        let results = BitstreamParser::parse(&forward, &mut state_fwd);
        prop_assert!(results.iter().all(|r| r.is_ok()));
        let mut state_rev = ParserState::new();
        BitstreamParser::parse(&reverse, &mut state_rev);

        for id in 0..16 {
            let fwd = state_fwd
                .get_sps(id)
                .map(|s| (s.pic_width_in_luma_samples, s.pic_height_in_luma_samples));
            let rev = state_rev
                .get_sps(id)
                .map(|s| (s.pic_width_in_luma_samples, s.pic_height_in_luma_samples));
            prop_assert_eq!(fwd, rev);
        }
    }
}

/// EOF semantics: parsing nothing yields nothing, repeatedly.
#[test]
fn empty_parse_is_stable() {
    let mut state = ParserState::new();
    assert!(BitstreamParser::parse(&[], &mut state).is_empty());
    assert!(BitstreamParser::parse(&[], &mut state).is_empty());
    assert!(get_slice_qp_y(&[], &mut state).is_empty());
}
