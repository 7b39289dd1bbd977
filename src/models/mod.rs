use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64, // g
    pub carbs: f64,   // g
    pub fat: f64,     // g
}

impl Macros {
    pub fn total_grams(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }

    /// Percentage of the macro total that `grams` represents (0 when empty).
    pub fn share(&self, grams: f64) -> f64 {
        let total = self.total_grams();
        if total <= 0.0 {
            0.0
        } else {
            grams / total * 100.0
        }
    }

    fn is_valid(&self) -> bool {
        [self.protein, self.carbs, self.fat]
            .iter()
            .all(|v| is_non_negative(*v))
    }
}

/// Minutes of activity needed to burn the estimated calories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEquivalent {
    pub walking: f64,
    pub running: f64,
    pub cycling: f64,
}

impl ExerciseEquivalent {
    fn is_valid(&self) -> bool {
        [self.walking, self.running, self.cycling]
            .iter()
            .all(|v| is_non_negative(*v))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub food_name: String,
    pub total_calories: f64,
    pub macros: Macros,
    pub health_tip: String,
    pub ingredients: Vec<String>,
    pub is_food: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<ExerciseEquivalent>,
}

impl AnalysisResult {
    /// Parse the model's JSON text and check it against `variant`.
    ///
    /// Field presence is checked on the raw JSON first so a missing field is
    /// reported by name; nested objects are then checked by serde, and value
    /// ranges last. Results with `isFood: false` skip the range checks since
    /// their nutrition fields carry no meaning.
    pub fn parse(text: &str, variant: SchemaVariant) -> Result<Self, AnalysisError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| AnalysisError::InvalidResponse(format!("not valid JSON: {}", e)))?;

        let object = value.as_object().ok_or_else(|| {
            AnalysisError::InvalidResponse("top-level value is not an object".to_string())
        })?;

        for field in variant.required_fields() {
            match object.get(*field) {
                None | Some(Value::Null) => {
                    return Err(AnalysisError::InvalidResponse(format!(
                        "missing required field `{}`",
                        field
                    )));
                }
                Some(_) => {}
            }
        }

        let result: AnalysisResult = serde_json::from_value(value)
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

        if result.is_food {
            result.check_ranges()?;
        }

        Ok(result)
    }

    fn check_ranges(&self) -> Result<(), AnalysisError> {
        let violation = if self.food_name.trim().is_empty() {
            Some("foodName is empty")
        } else if !is_non_negative(self.total_calories) {
            Some("totalCalories must be a non-negative number")
        } else if !self.macros.is_valid() {
            Some("macros must be non-negative numbers")
        } else if self
            .health_score
            .is_some_and(|s| !(0.0..=100.0).contains(&s))
        {
            Some("healthScore must be within 0..=100")
        } else if self.exercise.is_some_and(|e| !e.is_valid()) {
            Some("exercise minutes must be non-negative numbers")
        } else {
            None
        };

        match violation {
            Some(msg) => Err(AnalysisError::InvalidResponse(msg.to_string())),
            None => Ok(()),
        }
    }
}

fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// Which structured-output schema the model is asked to fill.
///
/// `Basic` is the older shape without score, tags and exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVariant {
    Basic,
    #[default]
    Extended,
}

const BASIC_REQUIRED: &[&str] = &[
    "foodName",
    "totalCalories",
    "macros",
    "healthTip",
    "isFood",
    "ingredients",
];

const EXTENDED_REQUIRED: &[&str] = &[
    "foodName",
    "totalCalories",
    "macros",
    "healthTip",
    "isFood",
    "ingredients",
    "healthScore",
    "tags",
    "exercise",
];

impl SchemaVariant {
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            SchemaVariant::Basic => BASIC_REQUIRED,
            SchemaVariant::Extended => EXTENDED_REQUIRED,
        }
    }
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SchemaVariant::Basic => "basic",
            SchemaVariant::Extended => "extended",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(SchemaVariant::Basic),
            "extended" => Ok(SchemaVariant::Extended),
            other => Err(format!(
                "unknown schema variant '{}' (expected 'basic' or 'extended')",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIMCHI_FRIED_RICE: &str = r##"{"foodName":"김치볶음밥","totalCalories":550,"macros":{"protein":15,"carbs":80,"fat":18},"healthTip":"나트륨 섭취에 주의하세요.","ingredients":["김치","밥","돼지고기"],"isFood":true,"healthScore":65,"tags":["#한식"],"exercise":{"walking":55,"running":28,"cycling":40}}"##;

    #[test]
    fn test_parse_full_result() {
        let result = AnalysisResult::parse(KIMCHI_FRIED_RICE, SchemaVariant::Extended).unwrap();

        assert_eq!(result.food_name, "김치볶음밥");
        assert_eq!(result.total_calories, 550.0);
        assert_eq!(result.macros.total_grams(), 113.0);
        assert_eq!(result.ingredients, vec!["김치", "밥", "돼지고기"]);
        assert_eq!(result.health_score, Some(65.0));
        assert_eq!(result.tags.as_deref(), Some(&["#한식".to_string()][..]));
        assert_eq!(result.exercise.unwrap().running, 28.0);
    }

    #[test]
    fn test_basic_variant_accepts_older_shape() {
        let json = r#"{"foodName":"샐러드","totalCalories":180,"macros":{"protein":6,"carbs":14,"fat":11},
            "healthTip":"드레싱은 따로 곁들이세요.","ingredients":[],"isFood":true}"#;

        let result = AnalysisResult::parse(json, SchemaVariant::Basic).unwrap();
        assert!(result.health_score.is_none());
        assert!(result.tags.is_none());

        let err = AnalysisResult::parse(json, SchemaVariant::Extended).unwrap_err();
        assert!(err.to_string().contains("healthScore"));
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let json = r#"{"foodName":"피자","macros":{"protein":20,"carbs":60,"fat":25},
            "healthTip":"한 조각만!","ingredients":["치즈"],"isFood":true}"#;

        match AnalysisResult::parse(json, SchemaVariant::Basic) {
            Err(AnalysisError::InvalidResponse(msg)) => assert!(msg.contains("totalCalories")),
            other => panic!("expected InvalidResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_nested_macro_rejected() {
        let json = r#"{"foodName":"피자","totalCalories":700,"macros":{"protein":20,"carbs":60},
            "healthTip":"한 조각만!","ingredients":["치즈"],"isFood":true}"#;

        assert!(matches!(
            AnalysisResult::parse(json, SchemaVariant::Basic),
            Err(AnalysisError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_not_json_rejected() {
        assert!(matches!(
            AnalysisResult::parse("Yemek: Pizza\nKalori: 650", SchemaVariant::Basic),
            Err(AnalysisError::InvalidResponse(_))
        ));
        assert!(matches!(
            AnalysisResult::parse("[1, 2, 3]", SchemaVariant::Basic),
            Err(AnalysisError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let score = KIMCHI_FRIED_RICE.replace("\"healthScore\":65", "\"healthScore\":140");
        assert!(AnalysisResult::parse(&score, SchemaVariant::Extended).is_err());

        let calories = KIMCHI_FRIED_RICE.replace("\"totalCalories\":550", "\"totalCalories\":-5");
        assert!(AnalysisResult::parse(&calories, SchemaVariant::Extended).is_err());

        let name = KIMCHI_FRIED_RICE.replace("김치볶음밥", " ");
        assert!(AnalysisResult::parse(&name, SchemaVariant::Extended).is_err());
    }

    #[test]
    fn test_not_food_skips_range_checks() {
        let json = r#"{"foodName":"","totalCalories":0,"macros":{"protein":0,"carbs":0,"fat":0},
            "healthTip":"","ingredients":[],"isFood":false,"healthScore":0,"tags":[],
            "exercise":{"walking":0,"running":0,"cycling":0}}"#;

        let result = AnalysisResult::parse(json, SchemaVariant::Extended).unwrap();
        assert!(!result.is_food);
    }

    #[test]
    fn test_macro_share() {
        let macros = Macros { protein: 25.0, carbs: 50.0, fat: 25.0 };
        assert_eq!(macros.share(macros.carbs), 50.0);

        let empty = Macros { protein: 0.0, carbs: 0.0, fat: 0.0 };
        assert_eq!(empty.share(0.0), 0.0);
    }

    #[test]
    fn test_schema_variant_from_str() {
        assert_eq!("Basic".parse::<SchemaVariant>(), Ok(SchemaVariant::Basic));
        assert_eq!(" extended ".parse::<SchemaVariant>(), Ok(SchemaVariant::Extended));
        assert!("v3".parse::<SchemaVariant>().is_err());
    }
}
