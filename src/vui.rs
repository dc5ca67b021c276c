use crate::bitreader::BitReader;
use crate::eg::read_ue;
use crate::hrd::HrdParameters;
use crate::{range_check, Result};

pub const EXTENDED_SAR: u8 = 255;

/// vui_parameters() syntax (E.2.1), owned by the SPS.
#[derive(Debug, Clone, Default)]
pub struct VuiParameters {
    pub aspect_ratio_info_present_flag: bool,
    pub aspect_ratio_idc: u8,
    pub sar_width: u16,
    pub sar_height: u16,

    pub overscan_info_present_flag: bool,
    pub overscan_appropriate_flag: bool,

    pub video_signal_type_present_flag: bool,
    pub video_format: u8,
    pub video_full_range_flag: bool,
    pub colour_description_present_flag: bool,
    pub colour_primaries: u8,
    pub transfer_characteristics: u8,
    pub matrix_coeffs: u8,

    pub chroma_loc_info_present_flag: bool,
    pub chroma_sample_loc_type_top_field: u32,
    pub chroma_sample_loc_type_bottom_field: u32,

    pub neutral_chroma_indication_flag: bool,
    pub field_seq_flag: bool,
    pub frame_field_info_present_flag: bool,

    pub default_display_window_flag: bool,
    pub def_disp_win_left_offset: u32,
    pub def_disp_win_right_offset: u32,
    pub def_disp_win_top_offset: u32,
    pub def_disp_win_bottom_offset: u32,

    pub vui_timing_info_present_flag: bool,
    pub vui_num_units_in_tick: u32,
    pub vui_time_scale: u32,
    pub vui_poc_proportional_to_timing_flag: bool,
    pub vui_num_ticks_poc_diff_one_minus1: u32,
    pub vui_hrd_parameters_present_flag: bool,
    pub hrd_parameters: Option<HrdParameters>,

    pub bitstream_restriction_flag: bool,
    pub tiles_fixed_structure_flag: bool,
    pub motion_vectors_over_pic_boundaries_flag: bool,
    pub restricted_ref_pic_lists_flag: bool,
    pub min_spatial_segmentation_idc: u32,
    pub max_bytes_per_pic_denom: u32,
    pub max_bits_per_min_cu_denom: u32,
    pub log2_max_mv_length_horizontal: u32,
    pub log2_max_mv_length_vertical: u32,
}

impl VuiParameters {
    pub fn parse(reader: &mut BitReader, sps_max_sub_layers_minus1: u8) -> Result<Self> {
        let mut vui = VuiParameters::default();

        vui.aspect_ratio_info_present_flag = reader.read_flag()?;
        if vui.aspect_ratio_info_present_flag {
            vui.aspect_ratio_idc = reader.read_u8()?;
            if vui.aspect_ratio_idc == EXTENDED_SAR {
                vui.sar_width = reader.read_bits(16)? as u16;
                vui.sar_height = reader.read_bits(16)? as u16;
            }
        }

        vui.overscan_info_present_flag = reader.read_flag()?;
        if vui.overscan_info_present_flag {
            vui.overscan_appropriate_flag = reader.read_flag()?;
        }

        vui.video_signal_type_present_flag = reader.read_flag()?;
        if vui.video_signal_type_present_flag {
            vui.video_format = reader.read_bits(3)? as u8;
            vui.video_full_range_flag = reader.read_flag()?;
            vui.colour_description_present_flag = reader.read_flag()?;
            if vui.colour_description_present_flag {
                vui.colour_primaries = reader.read_u8()?;
                vui.transfer_characteristics = reader.read_u8()?;
                vui.matrix_coeffs = reader.read_u8()?;
            }
        }

        vui.chroma_loc_info_present_flag = reader.read_flag()?;
        if vui.chroma_loc_info_present_flag {
            vui.chroma_sample_loc_type_top_field = read_ue(reader)?;
            range_check(
                "chroma_sample_loc_type_top_field",
                vui.chroma_sample_loc_type_top_field as i64,
                0,
                5,
            )?;
            vui.chroma_sample_loc_type_bottom_field = read_ue(reader)?;
            range_check(
                "chroma_sample_loc_type_bottom_field",
                vui.chroma_sample_loc_type_bottom_field as i64,
                0,
                5,
            )?;
        }

        vui.neutral_chroma_indication_flag = reader.read_flag()?;
        vui.field_seq_flag = reader.read_flag()?;
        vui.frame_field_info_present_flag = reader.read_flag()?;

        vui.default_display_window_flag = reader.read_flag()?;
        if vui.default_display_window_flag {
            vui.def_disp_win_left_offset = read_ue(reader)?;
            vui.def_disp_win_right_offset = read_ue(reader)?;
            vui.def_disp_win_top_offset = read_ue(reader)?;
            vui.def_disp_win_bottom_offset = read_ue(reader)?;
        }

        vui.vui_timing_info_present_flag = reader.read_flag()?;
        if vui.vui_timing_info_present_flag {
            vui.vui_num_units_in_tick = reader.read_bits(32)?;
            vui.vui_time_scale = reader.read_bits(32)?;
            vui.vui_poc_proportional_to_timing_flag = reader.read_flag()?;
            if vui.vui_poc_proportional_to_timing_flag {
                vui.vui_num_ticks_poc_diff_one_minus1 = read_ue(reader)?;
            }
            vui.vui_hrd_parameters_present_flag = reader.read_flag()?;
            if vui.vui_hrd_parameters_present_flag {
                vui.hrd_parameters =
                    Some(HrdParameters::parse(reader, true, sps_max_sub_layers_minus1)?);
            }
        }

        vui.bitstream_restriction_flag = reader.read_flag()?;
        if vui.bitstream_restriction_flag {
            vui.tiles_fixed_structure_flag = reader.read_flag()?;
            vui.motion_vectors_over_pic_boundaries_flag = reader.read_flag()?;
            vui.restricted_ref_pic_lists_flag = reader.read_flag()?;

            vui.min_spatial_segmentation_idc = read_ue(reader)?;
            range_check(
                "min_spatial_segmentation_idc",
                vui.min_spatial_segmentation_idc as i64,
                0,
                4095,
            )?;
            vui.max_bytes_per_pic_denom = read_ue(reader)?;
            range_check(
                "max_bytes_per_pic_denom",
                vui.max_bytes_per_pic_denom as i64,
                0,
                16,
            )?;
            vui.max_bits_per_min_cu_denom = read_ue(reader)?;
            range_check(
                "max_bits_per_min_cu_denom",
                vui.max_bits_per_min_cu_denom as i64,
                0,
                16,
            )?;
            vui.log2_max_mv_length_horizontal = read_ue(reader)?;
            range_check(
                "log2_max_mv_length_horizontal",
                vui.log2_max_mv_length_horizontal as i64,
                0,
                15,
            )?;
            vui.log2_max_mv_length_vertical = read_ue(reader)?;
            range_check(
                "log2_max_mv_length_vertical",
                vui.log2_max_mv_length_vertical as i64,
                0,
                15,
            )?;
        }

        Ok(vui)
    }

    /// Frames per second from the timing info, 0.0 when absent.
    pub fn framerate(&self) -> f64 {
        if !self.vui_timing_info_present_flag || self.vui_num_units_in_tick == 0 {
            return 0.0;
        }
        self.vui_time_scale as f64 / self.vui_num_units_in_tick as f64
    }
}
