use crate::bitreader::BitReader;
use crate::eg::read_ue;
use crate::{range_check, Result};

/// hrd_parameters(commonInfPresentFlag, maxNumSubLayersMinus1) (E.2.2).
#[derive(Debug, Clone)]
pub struct HrdParameters {
    pub nal_hrd_parameters_present_flag: bool,
    pub vcl_hrd_parameters_present_flag: bool,
    pub sub_pic_hrd_params_present_flag: bool,
    pub tick_divisor_minus2: u8,
    pub du_cpb_removal_delay_increment_length_minus1: u8,
    pub sub_pic_cpb_params_in_pic_timing_sei_flag: bool,
    pub dpb_output_delay_du_length_minus1: u8,
    pub bit_rate_scale: u8,
    pub cpb_size_scale: u8,
    pub cpb_size_du_scale: u8,
    pub initial_cpb_removal_delay_length_minus1: u8,
    pub au_cpb_removal_delay_length_minus1: u8,
    pub dpb_output_delay_length_minus1: u8,
    pub sub_layers: Vec<HrdSubLayer>,
}

/// Per-sub-layer part of hrd_parameters().
#[derive(Debug, Clone, Default)]
pub struct HrdSubLayer {
    pub fixed_pic_rate_general_flag: bool,
    pub fixed_pic_rate_within_cvs_flag: bool,
    pub elemental_duration_in_tc_minus1: u32,
    pub low_delay_hrd_flag: bool,
    pub cpb_cnt_minus1: u32,
    pub nal_hrd: Vec<SubLayerHrdParameters>,
    pub vcl_hrd: Vec<SubLayerHrdParameters>,
}

/// sub_layer_hrd_parameters(subLayerId) (E.2.3), one entry per CPB.
#[derive(Debug, Clone)]
pub struct SubLayerHrdParameters {
    pub bit_rate_value_minus1: u32,
    pub cpb_size_value_minus1: u32,
    pub cpb_size_du_value_minus1: Option<u32>,
    pub bit_rate_du_value_minus1: Option<u32>,
    pub cbr_flag: bool,
}

impl SubLayerHrdParameters {
    fn parse_list(
        reader: &mut BitReader,
        cpb_cnt: u32,
        sub_pic_hrd_params_present_flag: bool,
    ) -> Result<Vec<Self>> {
        let mut entries = Vec::with_capacity(cpb_cnt as usize);

        for _ in 0..cpb_cnt {
            let bit_rate_value_minus1 = read_ue(reader)?;
            let cpb_size_value_minus1 = read_ue(reader)?;

            let mut cpb_size_du_value_minus1 = None;
            let mut bit_rate_du_value_minus1 = None;
            if sub_pic_hrd_params_present_flag {
                cpb_size_du_value_minus1 = Some(read_ue(reader)?);
                bit_rate_du_value_minus1 = Some(read_ue(reader)?);
            }

            let cbr_flag = reader.read_flag()?;

            entries.push(SubLayerHrdParameters {
                bit_rate_value_minus1,
                cpb_size_value_minus1,
                cpb_size_du_value_minus1,
                bit_rate_du_value_minus1,
                cbr_flag,
            });
        }

        Ok(entries)
    }
}

impl HrdParameters {
    pub fn parse(
        reader: &mut BitReader,
        common_inf_present_flag: bool,
        max_num_sub_layers_minus1: u8,
    ) -> Result<Self> {
        let mut hrd = HrdParameters {
            nal_hrd_parameters_present_flag: false,
            vcl_hrd_parameters_present_flag: false,
            sub_pic_hrd_params_present_flag: false,
            tick_divisor_minus2: 0,
            du_cpb_removal_delay_increment_length_minus1: 0,
            sub_pic_cpb_params_in_pic_timing_sei_flag: false,
            dpb_output_delay_du_length_minus1: 0,
            bit_rate_scale: 0,
            cpb_size_scale: 0,
            cpb_size_du_scale: 0,
            initial_cpb_removal_delay_length_minus1: 23,
            au_cpb_removal_delay_length_minus1: 23,
            dpb_output_delay_length_minus1: 23,
            sub_layers: Vec::new(),
        };

        if common_inf_present_flag {
            hrd.nal_hrd_parameters_present_flag = reader.read_flag()?;
            hrd.vcl_hrd_parameters_present_flag = reader.read_flag()?;

            if hrd.nal_hrd_parameters_present_flag || hrd.vcl_hrd_parameters_present_flag {
                hrd.sub_pic_hrd_params_present_flag = reader.read_flag()?;
                if hrd.sub_pic_hrd_params_present_flag {
                    hrd.tick_divisor_minus2 = reader.read_u8()?;
                    hrd.du_cpb_removal_delay_increment_length_minus1 =
                        reader.read_bits(5)? as u8;
                    hrd.sub_pic_cpb_params_in_pic_timing_sei_flag = reader.read_flag()?;
                    hrd.dpb_output_delay_du_length_minus1 = reader.read_bits(5)? as u8;
                }

                hrd.bit_rate_scale = reader.read_bits(4)? as u8;
                hrd.cpb_size_scale = reader.read_bits(4)? as u8;
                if hrd.sub_pic_hrd_params_present_flag {
                    hrd.cpb_size_du_scale = reader.read_bits(4)? as u8;
                }

                hrd.initial_cpb_removal_delay_length_minus1 = reader.read_bits(5)? as u8;
                hrd.au_cpb_removal_delay_length_minus1 = reader.read_bits(5)? as u8;
                hrd.dpb_output_delay_length_minus1 = reader.read_bits(5)? as u8;
            }
        }

        for _ in 0..=max_num_sub_layers_minus1 {
            let mut sub_layer = HrdSubLayer {
                fixed_pic_rate_within_cvs_flag: true,
                ..Default::default()
            };

            sub_layer.fixed_pic_rate_general_flag = reader.read_flag()?;
            if !sub_layer.fixed_pic_rate_general_flag {
                sub_layer.fixed_pic_rate_within_cvs_flag = reader.read_flag()?;
            }

            if sub_layer.fixed_pic_rate_within_cvs_flag {
                sub_layer.elemental_duration_in_tc_minus1 = read_ue(reader)?;
                range_check(
                    "elemental_duration_in_tc_minus1",
                    sub_layer.elemental_duration_in_tc_minus1 as i64,
                    0,
                    2047,
                )?;
            } else {
                sub_layer.low_delay_hrd_flag = reader.read_flag()?;
            }

            if !sub_layer.low_delay_hrd_flag {
                sub_layer.cpb_cnt_minus1 = read_ue(reader)?;
                range_check("cpb_cnt_minus1", sub_layer.cpb_cnt_minus1 as i64, 0, 31)?;
            }

            if hrd.nal_hrd_parameters_present_flag {
                sub_layer.nal_hrd = SubLayerHrdParameters::parse_list(
                    reader,
                    sub_layer.cpb_cnt_minus1 + 1,
                    hrd.sub_pic_hrd_params_present_flag,
                )?;
            }

            if hrd.vcl_hrd_parameters_present_flag {
                sub_layer.vcl_hrd = SubLayerHrdParameters::parse_list(
                    reader,
                    sub_layer.cpb_cnt_minus1 + 1,
                    hrd.sub_pic_hrd_params_present_flag,
                )?;
            }

            hrd.sub_layers.push(sub_layer);
        }

        Ok(hrd)
    }
}
