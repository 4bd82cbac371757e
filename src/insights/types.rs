//! Insight types shared by the client, orchestrator and views

use serde::{Deserialize, Serialize};

/// Category of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Growth,
    Finance,
    Warning,
}

/// Urgency of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    High,
    Medium,
    Low,
}

/// One generated recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiInsight {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub priority: InsightPriority,
}

/// Insights split into the advisor view's two columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightGroups {
    /// Growth opportunities
    pub growth: Vec<AiInsight>,
    /// Financial stewardship: finance and warning insights
    pub stewardship: Vec<AiInsight>,
}

impl InsightGroups {
    pub fn from_insights(insights: &[AiInsight]) -> Self {
        let (growth, stewardship) = insights
            .iter()
            .cloned()
            .partition(|i| i.kind == InsightType::Growth);
        Self { growth, stewardship }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(kind: InsightType) -> AiInsight {
        AiInsight {
            title: "t".to_string(),
            description: "d".to_string(),
            kind,
            priority: InsightPriority::Low,
        }
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(insight(InsightType::Warning)).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["priority"], "low");
    }

    #[test]
    fn test_grouping() {
        let groups = InsightGroups::from_insights(&[
            insight(InsightType::Finance),
            insight(InsightType::Growth),
            insight(InsightType::Warning),
        ]);
        assert_eq!(groups.growth.len(), 1);
        assert_eq!(groups.stewardship.len(), 2);
        assert_eq!(groups.stewardship[1].kind, InsightType::Warning);
    }
}
