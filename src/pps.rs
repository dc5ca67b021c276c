use crate::bitreader::BitReader;
use crate::eg::{read_se, read_ue};
use crate::pps_ext::{PpsRangeExtension, PpsSccExtension};
use crate::scaling::ScalingListData;
use crate::{range_check, Result};

/// pic_parameter_set_rbsp() syntax (7.3.2.3.1).
#[derive(Debug, Clone)]
pub struct Pps {
    pub pps_pic_parameter_set_id: u32,
    pub pps_seq_parameter_set_id: u32,
    pub dependent_slice_segments_enabled_flag: bool,
    pub output_flag_present_flag: bool,
    pub num_extra_slice_header_bits: u8,
    pub sign_data_hiding_enabled_flag: bool,
    pub cabac_init_present_flag: bool,
    pub num_ref_idx_l0_default_active_minus1: u32,
    pub num_ref_idx_l1_default_active_minus1: u32,
    pub init_qp_minus26: i32,
    pub constrained_intra_pred_flag: bool,
    pub transform_skip_enabled_flag: bool,
    pub cu_qp_delta_enabled_flag: bool,
    pub diff_cu_qp_delta_depth: u32,
    pub pps_cb_qp_offset: i32,
    pub pps_cr_qp_offset: i32,
    pub pps_slice_chroma_qp_offsets_present_flag: bool,
    pub weighted_pred_flag: bool,
    pub weighted_bipred_flag: bool,
    pub transquant_bypass_enabled_flag: bool,
    pub tiles_enabled_flag: bool,
    pub entropy_coding_sync_enabled_flag: bool,
    pub num_tile_columns_minus1: u32,
    pub num_tile_rows_minus1: u32,
    pub uniform_spacing_flag: bool,
    pub column_width_minus1: Vec<u32>,
    pub row_height_minus1: Vec<u32>,
    pub loop_filter_across_tiles_enabled_flag: bool,
    pub pps_loop_filter_across_slices_enabled_flag: bool,
    pub deblocking_filter_control_present_flag: bool,
    pub deblocking_filter_override_enabled_flag: bool,
    pub pps_deblocking_filter_disabled_flag: bool,
    pub pps_beta_offset_div2: i32,
    pub pps_tc_offset_div2: i32,
    pub pps_scaling_list_data_present_flag: bool,
    pub scaling_list_data: Option<ScalingListData>,
    pub lists_modification_present_flag: bool,
    pub log2_parallel_merge_level_minus2: u32,
    pub slice_segment_header_extension_present_flag: bool,
    pub pps_extension_present_flag: bool,
    pub pps_range_extension_flag: bool,
    pub pps_multilayer_extension_flag: bool,
    pub pps_3d_extension_flag: bool,
    pub pps_scc_extension_flag: bool,
    pub pps_extension_4bits: u8,
    pub range_extension: Option<PpsRangeExtension>,
    pub scc_extension: Option<PpsSccExtension>,
}

impl Pps {
    pub fn parse(rbsp: &[u8]) -> Result<Self> {
        let mut reader = BitReader::new(rbsp);

        let pps_pic_parameter_set_id = read_ue(&mut reader)?;
        range_check("pps_pic_parameter_set_id", pps_pic_parameter_set_id as i64, 0, 63)?;
        let pps_seq_parameter_set_id = read_ue(&mut reader)?;
        range_check("pps_seq_parameter_set_id", pps_seq_parameter_set_id as i64, 0, 15)?;

        let dependent_slice_segments_enabled_flag = reader.read_flag()?;
        let output_flag_present_flag = reader.read_flag()?;
        let num_extra_slice_header_bits = reader.read_bits(3)? as u8;
        let sign_data_hiding_enabled_flag = reader.read_flag()?;
        let cabac_init_present_flag = reader.read_flag()?;

        let num_ref_idx_l0_default_active_minus1 = read_ue(&mut reader)?;
        range_check(
            "num_ref_idx_l0_default_active_minus1",
            num_ref_idx_l0_default_active_minus1 as i64,
            0,
            14,
        )?;
        let num_ref_idx_l1_default_active_minus1 = read_ue(&mut reader)?;
        range_check(
            "num_ref_idx_l1_default_active_minus1",
            num_ref_idx_l1_default_active_minus1 as i64,
            0,
            14,
        )?;

        // The lower bound is -(26 + QpBdOffsetY); the SPS is not resolved
        // at PPS parse time, so the loosest legal bound (8-bit depth 8,
        // QpBdOffsetY 48) applies.
        let init_qp_minus26 = read_se(&mut reader)?;
        range_check("init_qp_minus26", init_qp_minus26 as i64, -74, 25)?;

        let constrained_intra_pred_flag = reader.read_flag()?;
        let transform_skip_enabled_flag = reader.read_flag()?;

        let cu_qp_delta_enabled_flag = reader.read_flag()?;
        let mut diff_cu_qp_delta_depth = 0;
        if cu_qp_delta_enabled_flag {
            diff_cu_qp_delta_depth = read_ue(&mut reader)?;
        }

        let pps_cb_qp_offset = read_se(&mut reader)?;
        range_check("pps_cb_qp_offset", pps_cb_qp_offset as i64, -12, 12)?;
        let pps_cr_qp_offset = read_se(&mut reader)?;
        range_check("pps_cr_qp_offset", pps_cr_qp_offset as i64, -12, 12)?;
        let pps_slice_chroma_qp_offsets_present_flag = reader.read_flag()?;

        let weighted_pred_flag = reader.read_flag()?;
        let weighted_bipred_flag = reader.read_flag()?;
        let transquant_bypass_enabled_flag = reader.read_flag()?;

        let tiles_enabled_flag = reader.read_flag()?;
        let entropy_coding_sync_enabled_flag = reader.read_flag()?;

        let mut num_tile_columns_minus1 = 0;
        let mut num_tile_rows_minus1 = 0;
        let mut uniform_spacing_flag = true;
        let mut column_width_minus1 = Vec::new();
        let mut row_height_minus1 = Vec::new();
        let mut loop_filter_across_tiles_enabled_flag = true;
        if tiles_enabled_flag {
            num_tile_columns_minus1 = read_ue(&mut reader)?;
            num_tile_rows_minus1 = read_ue(&mut reader)?;
            uniform_spacing_flag = reader.read_flag()?;
            if !uniform_spacing_flag {
                for _ in 0..num_tile_columns_minus1 {
                    column_width_minus1.push(read_ue(&mut reader)?);
                }
                for _ in 0..num_tile_rows_minus1 {
                    row_height_minus1.push(read_ue(&mut reader)?);
                }
            }
            loop_filter_across_tiles_enabled_flag = reader.read_flag()?;
        }

        let pps_loop_filter_across_slices_enabled_flag = reader.read_flag()?;

        let deblocking_filter_control_present_flag = reader.read_flag()?;
        let mut deblocking_filter_override_enabled_flag = false;
        let mut pps_deblocking_filter_disabled_flag = false;
        let mut pps_beta_offset_div2 = 0;
        let mut pps_tc_offset_div2 = 0;
        if deblocking_filter_control_present_flag {
            deblocking_filter_override_enabled_flag = reader.read_flag()?;
            pps_deblocking_filter_disabled_flag = reader.read_flag()?;
            if !pps_deblocking_filter_disabled_flag {
                pps_beta_offset_div2 = read_se(&mut reader)?;
                range_check("pps_beta_offset_div2", pps_beta_offset_div2 as i64, -6, 6)?;
                pps_tc_offset_div2 = read_se(&mut reader)?;
                range_check("pps_tc_offset_div2", pps_tc_offset_div2 as i64, -6, 6)?;
            }
        }

        let pps_scaling_list_data_present_flag = reader.read_flag()?;
        let scaling_list_data = if pps_scaling_list_data_present_flag {
            Some(ScalingListData::parse(&mut reader)?)
        } else {
            None
        };

        let lists_modification_present_flag = reader.read_flag()?;
        let log2_parallel_merge_level_minus2 = read_ue(&mut reader)?;
        let slice_segment_header_extension_present_flag = reader.read_flag()?;

        let pps_extension_present_flag = reader.read_flag()?;
        let mut pps_range_extension_flag = false;
        let mut pps_multilayer_extension_flag = false;
        let mut pps_3d_extension_flag = false;
        let mut pps_scc_extension_flag = false;
        let mut pps_extension_4bits = 0;
        if pps_extension_present_flag {
            pps_range_extension_flag = reader.read_flag()?;
            pps_multilayer_extension_flag = reader.read_flag()?;
            pps_3d_extension_flag = reader.read_flag()?;
            pps_scc_extension_flag = reader.read_flag()?;
            pps_extension_4bits = reader.read_bits(4)? as u8;
        }

        let range_extension = if pps_range_extension_flag {
            Some(PpsRangeExtension::parse(
                &mut reader,
                transform_skip_enabled_flag,
            )?)
        } else {
            None
        };

        // The multilayer and 3D payloads are outside this parser's syntax
        // set; once either flag is set the remaining extension payload is
        // consumed as opaque data, and a following SCC extension cannot be
        // located.
        let mut scc_extension = None;
        if pps_multilayer_extension_flag || pps_3d_extension_flag {
            while reader.more_rbsp_data() {
                reader.read_flag()?;
            }
        } else if pps_scc_extension_flag {
            scc_extension = Some(PpsSccExtension::parse(&mut reader)?);
        }

        if pps_extension_4bits != 0 {
            while reader.more_rbsp_data() {
                reader.read_flag()?; // pps_extension_data_flag
            }
        }
        reader.rbsp_trailing_bits()?;

        Ok(Pps {
            pps_pic_parameter_set_id,
            pps_seq_parameter_set_id,
            dependent_slice_segments_enabled_flag,
            output_flag_present_flag,
            num_extra_slice_header_bits,
            sign_data_hiding_enabled_flag,
            cabac_init_present_flag,
            num_ref_idx_l0_default_active_minus1,
            num_ref_idx_l1_default_active_minus1,
            init_qp_minus26,
            constrained_intra_pred_flag,
            transform_skip_enabled_flag,
            cu_qp_delta_enabled_flag,
            diff_cu_qp_delta_depth,
            pps_cb_qp_offset,
            pps_cr_qp_offset,
            pps_slice_chroma_qp_offsets_present_flag,
            weighted_pred_flag,
            weighted_bipred_flag,
            transquant_bypass_enabled_flag,
            tiles_enabled_flag,
            entropy_coding_sync_enabled_flag,
            num_tile_columns_minus1,
            num_tile_rows_minus1,
            uniform_spacing_flag,
            column_width_minus1,
            row_height_minus1,
            loop_filter_across_tiles_enabled_flag,
            pps_loop_filter_across_slices_enabled_flag,
            deblocking_filter_control_present_flag,
            deblocking_filter_override_enabled_flag,
            pps_deblocking_filter_disabled_flag,
            pps_beta_offset_div2,
            pps_tc_offset_div2,
            pps_scaling_list_data_present_flag,
            scaling_list_data,
            lists_modification_present_flag,
            log2_parallel_merge_level_minus2,
            slice_segment_header_extension_present_flag,
            pps_extension_present_flag,
            pps_range_extension_flag,
            pps_multilayer_extension_flag,
            pps_3d_extension_flag,
            pps_scc_extension_flag,
            pps_extension_4bits,
            range_extension,
            scc_extension,
        })
    }
}
