use crate::bitreader::BitReader;
use crate::eg::read_ue;
use crate::ptl::ProfileTierLevel;
use crate::rps::ShortTermRefPicSet;
use crate::scaling::ScalingListData;
use crate::sps_ext::{Sps3dExtension, SpsMultilayerExtension, SpsRangeExtension, SpsSccExtension};
use crate::vui::VuiParameters;
use crate::{range_check, Result};

/// seq_parameter_set_rbsp() syntax (7.3.2.2.1).
#[derive(Debug, Clone)]
pub struct Sps {
    pub sps_video_parameter_set_id: u32,
    pub sps_max_sub_layers_minus1: u8,
    pub sps_temporal_id_nesting_flag: bool,
    pub profile_tier_level: ProfileTierLevel,
    pub sps_seq_parameter_set_id: u32,
    pub chroma_format_idc: u32,
    pub separate_colour_plane_flag: bool,
    pub pic_width_in_luma_samples: u32,
    pub pic_height_in_luma_samples: u32,
    pub conformance_window_flag: bool,
    pub conf_win_left_offset: u32,
    pub conf_win_right_offset: u32,
    pub conf_win_top_offset: u32,
    pub conf_win_bottom_offset: u32,
    pub bit_depth_luma_minus8: u32,
    pub bit_depth_chroma_minus8: u32,
    pub log2_max_pic_order_cnt_lsb_minus4: u32,
    pub sps_sub_layer_ordering_info_present_flag: bool,
    pub sps_max_dec_pic_buffering_minus1: Vec<u32>,
    pub sps_max_num_reorder_pics: Vec<u32>,
    pub sps_max_latency_increase_plus1: Vec<u32>,
    pub log2_min_luma_coding_block_size_minus3: u32,
    pub log2_diff_max_min_luma_coding_block_size: u32,
    pub log2_min_luma_transform_block_size_minus2: u32,
    pub log2_diff_max_min_luma_transform_block_size: u32,
    pub max_transform_hierarchy_depth_inter: u32,
    pub max_transform_hierarchy_depth_intra: u32,
    pub scaling_list_enabled_flag: bool,
    pub sps_scaling_list_data_present_flag: bool,
    pub scaling_list_data: Option<ScalingListData>,
    pub amp_enabled_flag: bool,
    pub sample_adaptive_offset_enabled_flag: bool,
    pub pcm_enabled_flag: bool,
    pub pcm_sample_bit_depth_luma_minus1: u8,
    pub pcm_sample_bit_depth_chroma_minus1: u8,
    pub log2_min_pcm_luma_coding_block_size_minus3: u32,
    pub log2_diff_max_min_pcm_luma_coding_block_size: u32,
    pub pcm_loop_filter_disabled_flag: bool,
    pub num_short_term_ref_pic_sets: u32,
    pub short_term_ref_pic_sets: Vec<ShortTermRefPicSet>,
    pub long_term_ref_pics_present_flag: bool,
    pub num_long_term_ref_pics_sps: u32,
    pub lt_ref_pic_poc_lsb_sps: Vec<u32>,
    pub used_by_curr_pic_lt_sps_flag: Vec<bool>,
    pub sps_temporal_mvp_enabled_flag: bool,
    pub strong_intra_smoothing_enabled_flag: bool,
    pub vui_parameters_present_flag: bool,
    pub vui_parameters: Option<VuiParameters>,
    pub sps_extension_present_flag: bool,
    pub sps_range_extension_flag: bool,
    pub sps_multilayer_extension_flag: bool,
    pub sps_3d_extension_flag: bool,
    pub sps_scc_extension_flag: bool,
    pub sps_extension_4bits: u8,
    pub range_extension: Option<SpsRangeExtension>,
    pub multilayer_extension: Option<SpsMultilayerExtension>,
    pub extension_3d: Option<Sps3dExtension>,
    pub scc_extension: Option<SpsSccExtension>,
}

impl Sps {
    pub fn parse(rbsp: &[u8]) -> Result<Self> {
        let mut reader = BitReader::new(rbsp);

        let sps_video_parameter_set_id = reader.read_bits(4)?;
        let sps_max_sub_layers_minus1 = reader.read_bits(3)? as u8;
        range_check(
            "sps_max_sub_layers_minus1",
            sps_max_sub_layers_minus1 as i64,
            0,
            6,
        )?;
        let sps_temporal_id_nesting_flag = reader.read_flag()?;

        let profile_tier_level = ProfileTierLevel::parse(&mut reader, sps_max_sub_layers_minus1)?;

        let sps_seq_parameter_set_id = read_ue(&mut reader)?;
        range_check("sps_seq_parameter_set_id", sps_seq_parameter_set_id as i64, 0, 15)?;

        let chroma_format_idc = read_ue(&mut reader)?;
        range_check("chroma_format_idc", chroma_format_idc as i64, 0, 3)?;
        let mut separate_colour_plane_flag = false;
        if chroma_format_idc == 3 {
            separate_colour_plane_flag = reader.read_flag()?;
        }

        let pic_width_in_luma_samples = read_ue(&mut reader)?;
        let pic_height_in_luma_samples = read_ue(&mut reader)?;

        let conformance_window_flag = reader.read_flag()?;
        let mut conf_win_left_offset = 0;
        let mut conf_win_right_offset = 0;
        let mut conf_win_top_offset = 0;
        let mut conf_win_bottom_offset = 0;
        if conformance_window_flag {
            conf_win_left_offset = read_ue(&mut reader)?;
            conf_win_right_offset = read_ue(&mut reader)?;
            conf_win_top_offset = read_ue(&mut reader)?;
            conf_win_bottom_offset = read_ue(&mut reader)?;
        }

        let bit_depth_luma_minus8 = read_ue(&mut reader)?;
        range_check("bit_depth_luma_minus8", bit_depth_luma_minus8 as i64, 0, 8)?;
        let bit_depth_chroma_minus8 = read_ue(&mut reader)?;
        range_check("bit_depth_chroma_minus8", bit_depth_chroma_minus8 as i64, 0, 8)?;

        let log2_max_pic_order_cnt_lsb_minus4 = read_ue(&mut reader)?;
        range_check(
            "log2_max_pic_order_cnt_lsb_minus4",
            log2_max_pic_order_cnt_lsb_minus4 as i64,
            0,
            12,
        )?;

        let sps_sub_layer_ordering_info_present_flag = reader.read_flag()?;
        let start = if sps_sub_layer_ordering_info_present_flag {
            0
        } else {
            sps_max_sub_layers_minus1
        };
        let mut sps_max_dec_pic_buffering_minus1 = Vec::new();
        let mut sps_max_num_reorder_pics = Vec::new();
        let mut sps_max_latency_increase_plus1 = Vec::new();
        for _ in start..=sps_max_sub_layers_minus1 {
            sps_max_dec_pic_buffering_minus1.push(read_ue(&mut reader)?);
            sps_max_num_reorder_pics.push(read_ue(&mut reader)?);
            sps_max_latency_increase_plus1.push(read_ue(&mut reader)?);
        }

        let log2_min_luma_coding_block_size_minus3 = read_ue(&mut reader)?;
        let log2_diff_max_min_luma_coding_block_size = read_ue(&mut reader)?;
        let log2_min_luma_transform_block_size_minus2 = read_ue(&mut reader)?;
        let log2_diff_max_min_luma_transform_block_size = read_ue(&mut reader)?;
        let max_transform_hierarchy_depth_inter = read_ue(&mut reader)?;
        let max_transform_hierarchy_depth_intra = read_ue(&mut reader)?;

        let scaling_list_enabled_flag = reader.read_flag()?;
        let mut sps_scaling_list_data_present_flag = false;
        let mut scaling_list_data = None;
        if scaling_list_enabled_flag {
            sps_scaling_list_data_present_flag = reader.read_flag()?;
            if sps_scaling_list_data_present_flag {
                scaling_list_data = Some(ScalingListData::parse(&mut reader)?);
            }
        }

        let amp_enabled_flag = reader.read_flag()?;
        let sample_adaptive_offset_enabled_flag = reader.read_flag()?;

        let pcm_enabled_flag = reader.read_flag()?;
        let mut pcm_sample_bit_depth_luma_minus1 = 0;
        let mut pcm_sample_bit_depth_chroma_minus1 = 0;
        let mut log2_min_pcm_luma_coding_block_size_minus3 = 0;
        let mut log2_diff_max_min_pcm_luma_coding_block_size = 0;
        let mut pcm_loop_filter_disabled_flag = false;
        if pcm_enabled_flag {
            pcm_sample_bit_depth_luma_minus1 = reader.read_bits(4)? as u8;
            pcm_sample_bit_depth_chroma_minus1 = reader.read_bits(4)? as u8;
            log2_min_pcm_luma_coding_block_size_minus3 = read_ue(&mut reader)?;
            log2_diff_max_min_pcm_luma_coding_block_size = read_ue(&mut reader)?;
            pcm_loop_filter_disabled_flag = reader.read_flag()?;
        }

        let num_short_term_ref_pic_sets = read_ue(&mut reader)?;
        range_check(
            "num_short_term_ref_pic_sets",
            num_short_term_ref_pic_sets as i64,
            0,
            64,
        )?;

        // The DPB bound for RPS entries comes from the highest sub-layer.
        let max_num_pics = sps_max_dec_pic_buffering_minus1.last().copied().unwrap_or(0);
        let mut short_term_ref_pic_sets: Vec<ShortTermRefPicSet> =
            Vec::with_capacity(num_short_term_ref_pic_sets as usize);
        for i in 0..num_short_term_ref_pic_sets {
            let rps = ShortTermRefPicSet::parse(
                &mut reader,
                i,
                num_short_term_ref_pic_sets,
                &short_term_ref_pic_sets,
                max_num_pics,
            )?;
            short_term_ref_pic_sets.push(rps);
        }

        let long_term_ref_pics_present_flag = reader.read_flag()?;
        let mut num_long_term_ref_pics_sps = 0;
        let mut lt_ref_pic_poc_lsb_sps = Vec::new();
        let mut used_by_curr_pic_lt_sps_flag = Vec::new();
        if long_term_ref_pics_present_flag {
            num_long_term_ref_pics_sps = read_ue(&mut reader)?;
            range_check(
                "num_long_term_ref_pics_sps",
                num_long_term_ref_pics_sps as i64,
                0,
                32,
            )?;
            let poc_lsb_bits = log2_max_pic_order_cnt_lsb_minus4 + 4;
            for _ in 0..num_long_term_ref_pics_sps {
                lt_ref_pic_poc_lsb_sps.push(reader.read_bits(poc_lsb_bits)?);
                used_by_curr_pic_lt_sps_flag.push(reader.read_flag()?);
            }
        }

        let sps_temporal_mvp_enabled_flag = reader.read_flag()?;
        let strong_intra_smoothing_enabled_flag = reader.read_flag()?;

        let vui_parameters_present_flag = reader.read_flag()?;
        let vui_parameters = if vui_parameters_present_flag {
            Some(VuiParameters::parse(&mut reader, sps_max_sub_layers_minus1)?)
        } else {
            None
        };

        let sps_extension_present_flag = reader.read_flag()?;
        let mut sps_range_extension_flag = false;
        let mut sps_multilayer_extension_flag = false;
        let mut sps_3d_extension_flag = false;
        let mut sps_scc_extension_flag = false;
        let mut sps_extension_4bits = 0;
        if sps_extension_present_flag {
            sps_range_extension_flag = reader.read_flag()?;
            sps_multilayer_extension_flag = reader.read_flag()?;
            sps_3d_extension_flag = reader.read_flag()?;
            sps_scc_extension_flag = reader.read_flag()?;
            sps_extension_4bits = reader.read_bits(4)? as u8;
        }

        let range_extension = if sps_range_extension_flag {
            Some(SpsRangeExtension::parse(&mut reader)?)
        } else {
            None
        };
        let multilayer_extension = if sps_multilayer_extension_flag {
            Some(SpsMultilayerExtension::parse(&mut reader)?)
        } else {
            None
        };
        let extension_3d = if sps_3d_extension_flag {
            Some(Sps3dExtension::parse(&mut reader)?)
        } else {
            None
        };
        let scc_extension = if sps_scc_extension_flag {
            Some(SpsSccExtension::parse(
                &mut reader,
                chroma_format_idc,
                bit_depth_luma_minus8,
                bit_depth_chroma_minus8,
            )?)
        } else {
            None
        };

        if sps_extension_4bits != 0 {
            while reader.more_rbsp_data() {
                reader.read_flag()?; // sps_extension_data_flag
            }
        }
        reader.rbsp_trailing_bits()?;

        Ok(Sps {
            sps_video_parameter_set_id,
            sps_max_sub_layers_minus1,
            sps_temporal_id_nesting_flag,
            profile_tier_level,
            sps_seq_parameter_set_id,
            chroma_format_idc,
            separate_colour_plane_flag,
            pic_width_in_luma_samples,
            pic_height_in_luma_samples,
            conformance_window_flag,
            conf_win_left_offset,
            conf_win_right_offset,
            conf_win_top_offset,
            conf_win_bottom_offset,
            bit_depth_luma_minus8,
            bit_depth_chroma_minus8,
            log2_max_pic_order_cnt_lsb_minus4,
            sps_sub_layer_ordering_info_present_flag,
            sps_max_dec_pic_buffering_minus1,
            sps_max_num_reorder_pics,
            sps_max_latency_increase_plus1,
            log2_min_luma_coding_block_size_minus3,
            log2_diff_max_min_luma_coding_block_size,
            log2_min_luma_transform_block_size_minus2,
            log2_diff_max_min_luma_transform_block_size,
            max_transform_hierarchy_depth_inter,
            max_transform_hierarchy_depth_intra,
            scaling_list_enabled_flag,
            sps_scaling_list_data_present_flag,
            scaling_list_data,
            amp_enabled_flag,
            sample_adaptive_offset_enabled_flag,
            pcm_enabled_flag,
            pcm_sample_bit_depth_luma_minus1,
            pcm_sample_bit_depth_chroma_minus1,
            log2_min_pcm_luma_coding_block_size_minus3,
            log2_diff_max_min_pcm_luma_coding_block_size,
            pcm_loop_filter_disabled_flag,
            num_short_term_ref_pic_sets,
            short_term_ref_pic_sets,
            long_term_ref_pics_present_flag,
            num_long_term_ref_pics_sps,
            lt_ref_pic_poc_lsb_sps,
            used_by_curr_pic_lt_sps_flag,
            sps_temporal_mvp_enabled_flag,
            strong_intra_smoothing_enabled_flag,
            vui_parameters_present_flag,
            vui_parameters,
            sps_extension_present_flag,
            sps_range_extension_flag,
            sps_multilayer_extension_flag,
            sps_3d_extension_flag,
            sps_scc_extension_flag,
            sps_extension_4bits,
            range_extension,
            multilayer_extension,
            extension_3d,
            scc_extension,
        })
    }

    /// ChromaArrayType (7.4.3.2.1).
    pub fn chroma_array_type(&self) -> u32 {
        if self.separate_colour_plane_flag {
            0
        } else {
            self.chroma_format_idc
        }
    }

    /// DPB size bound used by RPS parsing, from the highest sub-layer.
    pub fn max_num_pics(&self) -> u32 {
        self.sps_max_dec_pic_buffering_minus1
            .last()
            .copied()
            .unwrap_or(0)
    }

    fn sub_width_height_c(&self) -> (u32, u32) {
        match self.chroma_format_idc {
            1 => (2, 2),
            2 => (2, 1),
            _ => (1, 1),
        }
    }

    /// Luma width after conformance-window cropping.
    pub fn width(&self) -> u32 {
        let (sub_w, _) = self.sub_width_height_c();
        self.pic_width_in_luma_samples
            .saturating_sub(sub_w * (self.conf_win_left_offset + self.conf_win_right_offset))
    }

    /// Luma height after conformance-window cropping.
    pub fn height(&self) -> u32 {
        let (_, sub_h) = self.sub_width_height_c();
        self.pic_height_in_luma_samples
            .saturating_sub(sub_h * (self.conf_win_top_offset + self.conf_win_bottom_offset))
    }
}
