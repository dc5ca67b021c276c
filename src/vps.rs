use crate::bitreader::BitReader;
use crate::eg::read_ue;
use crate::hrd::HrdParameters;
use crate::ptl::ProfileTierLevel;
use crate::{range_check, Result};

/// video_parameter_set_rbsp() syntax (7.3.2.1).
#[derive(Debug, Clone)]
pub struct Vps {
    pub vps_video_parameter_set_id: u32,
    pub vps_base_layer_internal_flag: bool,
    pub vps_base_layer_available_flag: bool,
    pub vps_max_layers_minus1: u32,
    pub vps_max_sub_layers_minus1: u8,
    pub vps_temporal_id_nesting_flag: bool,
    pub profile_tier_level: ProfileTierLevel,
    pub vps_sub_layer_ordering_info_present_flag: bool,
    pub vps_max_dec_pic_buffering_minus1: Vec<u32>,
    pub vps_max_num_reorder_pics: Vec<u32>,
    pub vps_max_latency_increase_plus1: Vec<u32>,
    pub vps_max_layer_id: u32,
    pub vps_num_layer_sets_minus1: u32,
    pub layer_id_included_flag: Vec<Vec<bool>>,
    pub vps_timing_info_present_flag: bool,
    pub vps_num_units_in_tick: u32,
    pub vps_time_scale: u32,
    pub vps_poc_proportional_to_timing_flag: bool,
    pub vps_num_ticks_poc_diff_one_minus1: u32,
    pub vps_num_hrd_parameters: u32,
    pub hrd_layer_set_idx: Vec<u32>,
    pub cprms_present_flag: Vec<bool>,
    pub hrd_parameters: Vec<HrdParameters>,
    pub vps_extension_flag: bool,
}

impl Vps {
    pub fn parse(rbsp: &[u8]) -> Result<Self> {
        let mut reader = BitReader::new(rbsp);

        let vps_video_parameter_set_id = reader.read_bits(4)?;
        let vps_base_layer_internal_flag = reader.read_flag()?;
        let vps_base_layer_available_flag = reader.read_flag()?;
        let vps_max_layers_minus1 = reader.read_bits(6)?;
        let vps_max_sub_layers_minus1 = reader.read_bits(3)? as u8;
        range_check(
            "vps_max_sub_layers_minus1",
            vps_max_sub_layers_minus1 as i64,
            0,
            6,
        )?;
        let vps_temporal_id_nesting_flag = reader.read_flag()?;
        reader.skip_bits(16)?; // vps_reserved_0xffff_16bits

        let profile_tier_level = ProfileTierLevel::parse(&mut reader, vps_max_sub_layers_minus1)?;

        let vps_sub_layer_ordering_info_present_flag = reader.read_flag()?;
        let start = if vps_sub_layer_ordering_info_present_flag {
            0
        } else {
            vps_max_sub_layers_minus1
        };

        let mut vps_max_dec_pic_buffering_minus1 = Vec::new();
        let mut vps_max_num_reorder_pics = Vec::new();
        let mut vps_max_latency_increase_plus1 = Vec::new();
        for _ in start..=vps_max_sub_layers_minus1 {
            vps_max_dec_pic_buffering_minus1.push(read_ue(&mut reader)?);
            vps_max_num_reorder_pics.push(read_ue(&mut reader)?);
            vps_max_latency_increase_plus1.push(read_ue(&mut reader)?);
        }

        let vps_max_layer_id = reader.read_bits(6)?;
        let vps_num_layer_sets_minus1 = read_ue(&mut reader)?;
        range_check(
            "vps_num_layer_sets_minus1",
            vps_num_layer_sets_minus1 as i64,
            0,
            1023,
        )?;

        let mut layer_id_included_flag = Vec::new();
        for _ in 1..=vps_num_layer_sets_minus1 {
            let mut included = Vec::with_capacity(vps_max_layer_id as usize + 1);
            for _ in 0..=vps_max_layer_id {
                included.push(reader.read_flag()?);
            }
            layer_id_included_flag.push(included);
        }

        let vps_timing_info_present_flag = reader.read_flag()?;
        let mut vps_num_units_in_tick = 0;
        let mut vps_time_scale = 0;
        let mut vps_poc_proportional_to_timing_flag = false;
        let mut vps_num_ticks_poc_diff_one_minus1 = 0;
        let mut vps_num_hrd_parameters = 0;
        let mut hrd_layer_set_idx = Vec::new();
        let mut cprms_present_flag = Vec::new();
        let mut hrd_parameters = Vec::new();

        if vps_timing_info_present_flag {
            vps_num_units_in_tick = reader.read_bits(32)?;
            vps_time_scale = reader.read_bits(32)?;
            vps_poc_proportional_to_timing_flag = reader.read_flag()?;
            if vps_poc_proportional_to_timing_flag {
                vps_num_ticks_poc_diff_one_minus1 = read_ue(&mut reader)?;
            }

            vps_num_hrd_parameters = read_ue(&mut reader)?;
            range_check(
                "vps_num_hrd_parameters",
                vps_num_hrd_parameters as i64,
                0,
                vps_num_layer_sets_minus1 as i64 + 1,
            )?;

            for i in 0..vps_num_hrd_parameters {
                hrd_layer_set_idx.push(read_ue(&mut reader)?);
                // cprms_present_flag[0] is inferred to 1.
                let cprms = if i > 0 { reader.read_flag()? } else { true };
                cprms_present_flag.push(cprms);
                hrd_parameters.push(HrdParameters::parse(
                    &mut reader,
                    cprms,
                    vps_max_sub_layers_minus1,
                )?);
            }
        }

        let vps_extension_flag = reader.read_flag()?;
        if vps_extension_flag {
            while reader.more_rbsp_data() {
                reader.read_flag()?; // vps_extension_data_flag
            }
        }
        reader.rbsp_trailing_bits()?;

        Ok(Vps {
            vps_video_parameter_set_id,
            vps_base_layer_internal_flag,
            vps_base_layer_available_flag,
            vps_max_layers_minus1,
            vps_max_sub_layers_minus1,
            vps_temporal_id_nesting_flag,
            profile_tier_level,
            vps_sub_layer_ordering_info_present_flag,
            vps_max_dec_pic_buffering_minus1,
            vps_max_num_reorder_pics,
            vps_max_latency_increase_plus1,
            vps_max_layer_id,
            vps_num_layer_sets_minus1,
            layer_id_included_flag,
            vps_timing_info_present_flag,
            vps_num_units_in_tick,
            vps_time_scale,
            vps_poc_proportional_to_timing_flag,
            vps_num_ticks_poc_diff_one_minus1,
            vps_num_hrd_parameters,
            hrd_layer_set_idx,
            cprms_present_flag,
            hrd_parameters,
            vps_extension_flag,
        })
    }
}
