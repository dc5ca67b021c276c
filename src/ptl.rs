use crate::bitreader::BitReader;
use crate::Result;

/// profile_tier_level() syntax (7.3.3).
#[derive(Debug, Clone, Default)]
pub struct ProfileTierLevel {
    pub general_profile_space: u8,
    pub general_tier_flag: bool,
    pub general_profile_idc: u8,
    pub general_profile_compatibility_flags: u32,
    pub general_progressive_source_flag: bool,
    pub general_interlaced_source_flag: bool,
    pub general_non_packed_constraint_flag: bool,
    pub general_frame_only_constraint_flag: bool,
    pub general_inbld_flag: bool,
    pub general_level_idc: u8,
    pub sub_layer_profile_present_flag: Vec<bool>,
    pub sub_layer_level_present_flag: Vec<bool>,
    pub sub_layers: Vec<SubLayerProfileLevel>,
}

/// Per-sub-layer profile and level values; either half may be absent.
#[derive(Debug, Clone, Default)]
pub struct SubLayerProfileLevel {
    pub profile_space: u8,
    pub tier_flag: bool,
    pub profile_idc: u8,
    pub profile_compatibility_flags: u32,
    pub progressive_source_flag: bool,
    pub interlaced_source_flag: bool,
    pub non_packed_constraint_flag: bool,
    pub frame_only_constraint_flag: bool,
    pub inbld_flag: bool,
    pub level_idc: Option<u8>,
}

impl ProfileTierLevel {
    pub fn parse(reader: &mut BitReader, max_num_sub_layers_minus1: u8) -> Result<Self> {
        let mut ptl = ProfileTierLevel {
            general_profile_space: reader.read_bits(2)? as u8,
            general_tier_flag: reader.read_flag()?,
            general_profile_idc: reader.read_bits(5)? as u8,
            general_profile_compatibility_flags: reader.read_bits(32)?,
            general_progressive_source_flag: reader.read_flag()?,
            general_interlaced_source_flag: reader.read_flag()?,
            general_non_packed_constraint_flag: reader.read_flag()?,
            general_frame_only_constraint_flag: reader.read_flag()?,
            ..Default::default()
        };

        // 43 reserved/constraint bits we do not interpret, then the
        // inbld/reserved bit.
        reader.skip_bits(43)?;
        ptl.general_inbld_flag = reader.read_flag()?;

        ptl.general_level_idc = reader.read_u8()?;

        for _ in 0..max_num_sub_layers_minus1 {
            ptl.sub_layer_profile_present_flag.push(reader.read_flag()?);
            ptl.sub_layer_level_present_flag.push(reader.read_flag()?);
        }

        if max_num_sub_layers_minus1 > 0 {
            for _ in max_num_sub_layers_minus1..8 {
                reader.skip_bits(2)?; // reserved_zero_2bits
            }
        }

        for i in 0..max_num_sub_layers_minus1 as usize {
            let mut sub_layer = SubLayerProfileLevel::default();

            if ptl.sub_layer_profile_present_flag[i] {
                sub_layer.profile_space = reader.read_bits(2)? as u8;
                sub_layer.tier_flag = reader.read_flag()?;
                sub_layer.profile_idc = reader.read_bits(5)? as u8;
                sub_layer.profile_compatibility_flags = reader.read_bits(32)?;
                sub_layer.progressive_source_flag = reader.read_flag()?;
                sub_layer.interlaced_source_flag = reader.read_flag()?;
                sub_layer.non_packed_constraint_flag = reader.read_flag()?;
                sub_layer.frame_only_constraint_flag = reader.read_flag()?;
                reader.skip_bits(43)?;
                sub_layer.inbld_flag = reader.read_flag()?;
            }

            if ptl.sub_layer_level_present_flag[i] {
                sub_layer.level_idc = Some(reader.read_u8()?);
            }

            ptl.sub_layers.push(sub_layer);
        }

        Ok(ptl)
    }
}
