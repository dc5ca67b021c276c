use crate::bitreader::BitReader;
use crate::eg::{read_se, read_ue};
use crate::{range_check, Result};

/// scaling_list_data() syntax (7.3.4).
///
/// Lists are indexed `[size_id][matrix_id]`; for size id 3 only matrix ids
/// 0 and 3 are coded (Table 7-4), the remaining slots keep their defaults.
#[derive(Debug, Clone)]
pub struct ScalingListData {
    pub scaling_list_pred_mode_flag: [[bool; 6]; 4],
    pub scaling_list_pred_matrix_id_delta: [[u32; 6]; 4],
    pub scaling_list_dc_coef_minus8: [[i32; 6]; 2],
    pub scaling_list: Vec<Vec<Vec<u8>>>,
}

impl ScalingListData {
    pub fn parse(reader: &mut BitReader) -> Result<Self> {
        let mut data = ScalingListData {
            scaling_list_pred_mode_flag: [[false; 6]; 4],
            scaling_list_pred_matrix_id_delta: [[0; 6]; 4],
            scaling_list_dc_coef_minus8: [[0; 6]; 2],
            scaling_list: vec![vec![Vec::new(); 6]; 4],
        };

        for size_id in 0..4usize {
            let step = if size_id == 3 { 3 } else { 1 };
            let mut matrix_id = 0usize;
            while matrix_id < 6 {
                let pred_mode = reader.read_flag()?;
                data.scaling_list_pred_mode_flag[size_id][matrix_id] = pred_mode;

                if !pred_mode {
                    let delta = read_ue(reader)?;
                    range_check(
                        "scaling_list_pred_matrix_id_delta",
                        delta as i64,
                        0,
                        (matrix_id / step) as i64,
                    )?;
                    data.scaling_list_pred_matrix_id_delta[size_id][matrix_id] = delta;
                } else {
                    let coef_num = std::cmp::min(64usize, 1 << (4 + (size_id << 1)));
                    let mut next_coef: i32 = 8;

                    if size_id > 1 {
                        let dc = read_se(reader)?;
                        range_check("scaling_list_dc_coef_minus8", dc as i64, -7, 247)?;
                        data.scaling_list_dc_coef_minus8[size_id - 2][matrix_id] = dc;
                        next_coef = dc + 8;
                    }

                    let mut coeffs = Vec::with_capacity(coef_num);
                    for _ in 0..coef_num {
                        let delta = read_se(reader)?;
                        range_check("scaling_list_delta_coef", delta as i64, -128, 127)?;
                        next_coef = (next_coef + delta + 256) % 256;
                        coeffs.push(next_coef as u8);
                    }
                    data.scaling_list[size_id][matrix_id] = coeffs;
                }

                matrix_id += step;
            }
        }

        Ok(data)
    }
}
