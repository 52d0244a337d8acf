use serde::{Deserialize, Serialize};

use crate::model::NodeRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub background: String,
    pub generator_fill: String,
    pub processor_fill: String,
    pub controller_fill: String,
    pub sink_fill: String,
    pub other_fill: String,
    pub disabled_fill: String,
    pub node_stroke: String,
    pub node_text_color: String,
    pub error_stroke: String,
    /// Edge color when the queue is empty.
    pub edge_cool: String,
    /// Edge color when the queue holds messages.
    pub edge_hot: String,
    pub rate_edge_color: String,
    pub depth_edge_color: String,
    pub backpressure_edge_color: String,
    pub guard_dasharray: String,
    pub group_fill: String,
    pub group_border: String,
}

impl Theme {
    pub fn modern() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            generator_fill: "#8FBC8F".to_string(),
            processor_fill: "#87CEEB".to_string(),
            controller_fill: "#DDA0DD".to_string(),
            sink_fill: "#F0E68C".to_string(),
            other_fill: "#D3D3D3".to_string(),
            disabled_fill: "#EFEFEF".to_string(),
            node_stroke: "#7A8AA6".to_string(),
            node_text_color: "#1C2430".to_string(),
            error_stroke: "#D9534F".to_string(),
            edge_cool: "#B0BEC5".to_string(),
            edge_hot: "#FF7043".to_string(),
            rate_edge_color: "#5C6BC0".to_string(),
            depth_edge_color: "#26A69A".to_string(),
            backpressure_edge_color: "#EF5350".to_string(),
            guard_dasharray: "6 4".to_string(),
            group_fill: "#F7FAFF".to_string(),
            group_border: "#D7E0F0".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#14181F".to_string(),
            generator_fill: "#4F7A4F".to_string(),
            processor_fill: "#3F6E8C".to_string(),
            controller_fill: "#7A5C7A".to_string(),
            sink_fill: "#8C8050".to_string(),
            other_fill: "#4A4F57".to_string(),
            disabled_fill: "#2A2F37".to_string(),
            node_stroke: "#5B6B82".to_string(),
            node_text_color: "#E6EBF2".to_string(),
            error_stroke: "#E0635F".to_string(),
            edge_cool: "#45535C".to_string(),
            edge_hot: "#FF8A65".to_string(),
            rate_edge_color: "#7986CB".to_string(),
            depth_edge_color: "#4DB6AC".to_string(),
            backpressure_edge_color: "#E57373".to_string(),
            guard_dasharray: "6 4".to_string(),
            group_fill: "#1B222C".to_string(),
            group_border: "#32405A".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" | "default" | "light" => Some(Self::modern()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    pub fn role_fill(&self, role: NodeRole) -> &str {
        match role {
            NodeRole::Generator => &self.generator_fill,
            NodeRole::Processor => &self.processor_fill,
            NodeRole::Controller => &self.controller_fill,
            NodeRole::Sink => &self.sink_fill,
            NodeRole::Other => &self.other_fill,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
