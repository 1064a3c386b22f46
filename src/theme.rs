use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub male_fill: String,
    pub female_fill: String,
    pub unknown_fill: String,
    pub box_border: String,
    pub placeholder_border: String,
    pub text_color: String,
    pub line_color: String,
    pub marriage_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            male_fill: "#D6E4F0".to_string(),
            female_fill: "#F8DFE5".to_string(),
            unknown_fill: "#EFEFEF".to_string(),
            box_border: "#8AA0B8".to_string(),
            placeholder_border: "#B8B8B8".to_string(),
            text_color: "#333333".to_string(),
            line_color: "#667788".to_string(),
            marriage_color: "#996633".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            male_fill: "#E3EDFB".to_string(),
            female_fill: "#FBE7EC".to_string(),
            unknown_fill: "#F2F4F7".to_string(),
            box_border: "#C7D2E5".to_string(),
            placeholder_border: "#C9CED6".to_string(),
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            marriage_color: "#A06A3C".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
