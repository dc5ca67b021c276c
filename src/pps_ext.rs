use crate::bitreader::BitReader;
use crate::eg::{read_se, read_ue};
use crate::{range_check, Result};

/// pps_range_extension() syntax (7.3.2.3.2).
#[derive(Debug, Clone, Default)]
pub struct PpsRangeExtension {
    pub log2_max_transform_skip_block_size_minus2: u32,
    pub cross_component_prediction_enabled_flag: bool,
    pub chroma_qp_offset_list_enabled_flag: bool,
    pub diff_cu_chroma_qp_offset_depth: u32,
    pub chroma_qp_offset_list_len_minus1: u32,
    pub cb_qp_offset_list: Vec<i32>,
    pub cr_qp_offset_list: Vec<i32>,
    pub log2_sao_offset_scale_luma: u32,
    pub log2_sao_offset_scale_chroma: u32,
}

impl PpsRangeExtension {
    pub fn parse(reader: &mut BitReader, transform_skip_enabled_flag: bool) -> Result<Self> {
        let mut ext = PpsRangeExtension::default();

        if transform_skip_enabled_flag {
            ext.log2_max_transform_skip_block_size_minus2 = read_ue(reader)?;
        }
        ext.cross_component_prediction_enabled_flag = reader.read_flag()?;

        ext.chroma_qp_offset_list_enabled_flag = reader.read_flag()?;
        if ext.chroma_qp_offset_list_enabled_flag {
            ext.diff_cu_chroma_qp_offset_depth = read_ue(reader)?;
            ext.chroma_qp_offset_list_len_minus1 = read_ue(reader)?;
            range_check(
                "chroma_qp_offset_list_len_minus1",
                ext.chroma_qp_offset_list_len_minus1 as i64,
                0,
                5,
            )?;
            for _ in 0..=ext.chroma_qp_offset_list_len_minus1 {
                let cb = read_se(reader)?;
                range_check("cb_qp_offset_list", cb as i64, -12, 12)?;
                ext.cb_qp_offset_list.push(cb);
                let cr = read_se(reader)?;
                range_check("cr_qp_offset_list", cr as i64, -12, 12)?;
                ext.cr_qp_offset_list.push(cr);
            }
        }

        ext.log2_sao_offset_scale_luma = read_ue(reader)?;
        ext.log2_sao_offset_scale_chroma = read_ue(reader)?;

        Ok(ext)
    }
}

/// pps_scc_extension() syntax (7.3.2.3.3).
#[derive(Debug, Clone, Default)]
pub struct PpsSccExtension {
    pub pps_curr_pic_ref_enabled_flag: bool,
    pub residual_adaptive_colour_transform_enabled_flag: bool,
    pub pps_slice_act_qp_offsets_present_flag: bool,
    pub pps_act_y_qp_offset_plus5: i32,
    pub pps_act_cb_qp_offset_plus5: i32,
    pub pps_act_cr_qp_offset_plus3: i32,
    pub pps_palette_predictor_initializers_present_flag: bool,
    pub pps_num_palette_predictor_initializers: u32,
    pub monochrome_palette_flag: bool,
    pub luma_bit_depth_entry_minus8: u32,
    pub chroma_bit_depth_entry_minus8: u32,
    pub pps_palette_predictor_initializers: Vec<Vec<u32>>,
}

impl PpsSccExtension {
    pub fn parse(reader: &mut BitReader) -> Result<Self> {
        let mut ext = PpsSccExtension::default();

        ext.pps_curr_pic_ref_enabled_flag = reader.read_flag()?;

        ext.residual_adaptive_colour_transform_enabled_flag = reader.read_flag()?;
        if ext.residual_adaptive_colour_transform_enabled_flag {
            ext.pps_slice_act_qp_offsets_present_flag = reader.read_flag()?;
            ext.pps_act_y_qp_offset_plus5 = read_se(reader)?;
            range_check("pps_act_y_qp_offset_plus5", ext.pps_act_y_qp_offset_plus5 as i64, -7, 17)?;
            ext.pps_act_cb_qp_offset_plus5 = read_se(reader)?;
            range_check(
                "pps_act_cb_qp_offset_plus5",
                ext.pps_act_cb_qp_offset_plus5 as i64,
                -7,
                17,
            )?;
            ext.pps_act_cr_qp_offset_plus3 = read_se(reader)?;
            range_check(
                "pps_act_cr_qp_offset_plus3",
                ext.pps_act_cr_qp_offset_plus3 as i64,
                -9,
                15,
            )?;
        }

        ext.pps_palette_predictor_initializers_present_flag = reader.read_flag()?;
        if ext.pps_palette_predictor_initializers_present_flag {
            ext.pps_num_palette_predictor_initializers = read_ue(reader)?;
            range_check(
                "pps_num_palette_predictor_initializers",
                ext.pps_num_palette_predictor_initializers as i64,
                0,
                128,
            )?;
            if ext.pps_num_palette_predictor_initializers > 0 {
                ext.monochrome_palette_flag = reader.read_flag()?;
                ext.luma_bit_depth_entry_minus8 = read_ue(reader)?;
                range_check(
                    "luma_bit_depth_entry_minus8",
                    ext.luma_bit_depth_entry_minus8 as i64,
                    0,
                    8,
                )?;
                if !ext.monochrome_palette_flag {
                    ext.chroma_bit_depth_entry_minus8 = read_ue(reader)?;
                    range_check(
                        "chroma_bit_depth_entry_minus8",
                        ext.chroma_bit_depth_entry_minus8 as i64,
                        0,
                        8,
                    )?;
                }

                let num_comps = if ext.monochrome_palette_flag { 1 } else { 3 };
                for comp in 0..num_comps {
                    let bit_depth = if comp == 0 {
                        ext.luma_bit_depth_entry_minus8 + 8
                    } else {
                        ext.chroma_bit_depth_entry_minus8 + 8
                    };
                    let mut initializers = Vec::new();
                    for _ in 0..ext.pps_num_palette_predictor_initializers {
                        initializers.push(reader.read_bits(bit_depth)?);
                    }
                    ext.pps_palette_predictor_initializers.push(initializers);
                }
            }
        }

        Ok(ext)
    }
}
