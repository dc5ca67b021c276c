use crate::bitreader::BitReader;
use crate::eg::read_ue;
use crate::{range_check, Result};

/// sps_range_extension() syntax (7.3.2.2.2).
#[derive(Debug, Clone, Default)]
pub struct SpsRangeExtension {
    pub transform_skip_rotation_enabled_flag: bool,
    pub transform_skip_context_enabled_flag: bool,
    pub implicit_rdpcm_enabled_flag: bool,
    pub explicit_rdpcm_enabled_flag: bool,
    pub extended_precision_processing_flag: bool,
    pub intra_smoothing_disabled_flag: bool,
    pub high_precision_offsets_enabled_flag: bool,
    pub persistent_rice_adaptation_enabled_flag: bool,
    pub cabac_bypass_alignment_enabled_flag: bool,
}

impl SpsRangeExtension {
    pub fn parse(reader: &mut BitReader) -> Result<Self> {
        Ok(SpsRangeExtension {
            transform_skip_rotation_enabled_flag: reader.read_flag()?,
            transform_skip_context_enabled_flag: reader.read_flag()?,
            implicit_rdpcm_enabled_flag: reader.read_flag()?,
            explicit_rdpcm_enabled_flag: reader.read_flag()?,
            extended_precision_processing_flag: reader.read_flag()?,
            intra_smoothing_disabled_flag: reader.read_flag()?,
            high_precision_offsets_enabled_flag: reader.read_flag()?,
            persistent_rice_adaptation_enabled_flag: reader.read_flag()?,
            cabac_bypass_alignment_enabled_flag: reader.read_flag()?,
        })
    }
}

/// sps_multilayer_extension() syntax (F.7.3.2.2.4).
#[derive(Debug, Clone, Default)]
pub struct SpsMultilayerExtension {
    pub inter_view_mv_vert_constraint_flag: bool,
}

impl SpsMultilayerExtension {
    pub fn parse(reader: &mut BitReader) -> Result<Self> {
        Ok(SpsMultilayerExtension {
            inter_view_mv_vert_constraint_flag: reader.read_flag()?,
        })
    }
}

/// sps_3d_extension() syntax (I.7.3.2.2.5). Indexed by depth layer flag
/// d in {0, 1}.
#[derive(Debug, Clone, Default)]
pub struct Sps3dExtension {
    pub iv_di_mc_enabled_flag: [bool; 2],
    pub iv_mv_scal_enabled_flag: [bool; 2],
    // d == 0 only
    pub log2_ivmc_sub_pb_size_minus3: u32,
    pub iv_res_pred_enabled_flag: bool,
    pub depth_ref_enabled_flag: bool,
    pub vsp_mc_enabled_flag: bool,
    pub dbbp_enabled_flag: bool,
    // d == 1 only
    pub tex_mc_enabled_flag: bool,
    pub log2_texmc_sub_pb_size_minus3: u32,
    pub intra_contour_enabled_flag: bool,
    pub intra_dc_only_wedge_enabled_flag: bool,
    pub cqt_cu_part_pred_enabled_flag: bool,
    pub inter_dc_only_enabled_flag: bool,
    pub skip_intra_enabled_flag: bool,
}

impl Sps3dExtension {
    pub fn parse(reader: &mut BitReader) -> Result<Self> {
        let mut ext = Sps3dExtension::default();

        for d in 0..2usize {
            ext.iv_di_mc_enabled_flag[d] = reader.read_flag()?;
            ext.iv_mv_scal_enabled_flag[d] = reader.read_flag()?;
            if d == 0 {
                ext.log2_ivmc_sub_pb_size_minus3 = read_ue(reader)?;
                ext.iv_res_pred_enabled_flag = reader.read_flag()?;
                ext.depth_ref_enabled_flag = reader.read_flag()?;
                ext.vsp_mc_enabled_flag = reader.read_flag()?;
                ext.dbbp_enabled_flag = reader.read_flag()?;
            } else {
                ext.tex_mc_enabled_flag = reader.read_flag()?;
                ext.log2_texmc_sub_pb_size_minus3 = read_ue(reader)?;
                ext.intra_contour_enabled_flag = reader.read_flag()?;
                ext.intra_dc_only_wedge_enabled_flag = reader.read_flag()?;
                ext.cqt_cu_part_pred_enabled_flag = reader.read_flag()?;
                ext.inter_dc_only_enabled_flag = reader.read_flag()?;
                ext.skip_intra_enabled_flag = reader.read_flag()?;
            }
        }

        Ok(ext)
    }
}

/// sps_scc_extension() syntax (7.3.2.2.3). Palette predictor
/// initializers are a table of `num_comps x (num_initializers)` entries,
/// each `bit_depth` bits wide.
#[derive(Debug, Clone, Default)]
pub struct SpsSccExtension {
    pub sps_curr_pic_ref_enabled_flag: bool,
    pub palette_mode_enabled_flag: bool,
    pub palette_max_size: u32,
    pub delta_palette_max_predictor_size: u32,
    pub sps_palette_predictor_initializers_present_flag: bool,
    pub sps_num_palette_predictor_initializers_minus1: u32,
    pub sps_palette_predictor_initializers: Vec<Vec<u32>>,
    pub motion_vector_resolution_control_idc: u8,
    pub intra_boundary_filtering_disabled_flag: bool,
}

impl SpsSccExtension {
    pub fn parse(
        reader: &mut BitReader,
        chroma_format_idc: u32,
        bit_depth_luma_minus8: u32,
        bit_depth_chroma_minus8: u32,
    ) -> Result<Self> {
        let mut ext = SpsSccExtension::default();

        ext.sps_curr_pic_ref_enabled_flag = reader.read_flag()?;

        ext.palette_mode_enabled_flag = reader.read_flag()?;
        if ext.palette_mode_enabled_flag {
            ext.palette_max_size = read_ue(reader)?;
            range_check("palette_max_size", ext.palette_max_size as i64, 0, 64)?;
            ext.delta_palette_max_predictor_size = read_ue(reader)?;
            range_check(
                "delta_palette_max_predictor_size",
                ext.delta_palette_max_predictor_size as i64,
                0,
                128,
            )?;

            ext.sps_palette_predictor_initializers_present_flag = reader.read_flag()?;
            if ext.sps_palette_predictor_initializers_present_flag {
                ext.sps_num_palette_predictor_initializers_minus1 = read_ue(reader)?;
                range_check(
                    "sps_num_palette_predictor_initializers_minus1",
                    ext.sps_num_palette_predictor_initializers_minus1 as i64,
                    0,
                    127,
                )?;

                let num_comps = if chroma_format_idc == 0 { 1 } else { 3 };
                for comp in 0..num_comps {
                    let bit_depth = if comp == 0 {
                        bit_depth_luma_minus8 + 8
                    } else {
                        bit_depth_chroma_minus8 + 8
                    };
                    let mut initializers = Vec::new();
                    for _ in 0..=ext.sps_num_palette_predictor_initializers_minus1 {
                        initializers.push(reader.read_bits(bit_depth)?);
                    }
                    ext.sps_palette_predictor_initializers.push(initializers);
                }
            }
        }

        // Value 3 is reserved but tolerated.
        ext.motion_vector_resolution_control_idc = reader.read_bits(2)? as u8;
        ext.intra_boundary_filtering_disabled_flag = reader.read_flag()?;

        Ok(ext)
    }
}
