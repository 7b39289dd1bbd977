use serde_json::{json, Value};

use crate::models::SchemaVariant;

const INSTRUCTION_HEAD: &str = "이 이미지를 분석하여 다음 정보를 제공해주세요:\n\
     1. 음식 이름과 추정 칼로리, 탄단지(g)\n\
     2. 건강 팁 (한 문장)\n\
     3. 주요 재료\n";

const INSTRUCTION_EXTENDED: &str = "4. **건강 점수**: 영양 균형을 고려하여 100점 만점 기준으로 점수를 매겨주세요. (예: 샐러드 90점, 피자 40점)\n\
     5. **스마트 태그**: 음식의 특징을 나타내는 태그 3~5개 (예: #고단백, #다이어트, #나트륨주의, #치팅데이)\n\
     6. **운동 환산**: 이 칼로리를 소모하기 위해 필요한 운동 시간(분)을 계산해주세요. (걷기, 달리기, 자전거 타기)\n";

const INSTRUCTION_TAIL: &str = "\n이미지에 음식이 없다면 isFood: false로 반환하세요.\n\
     모든 텍스트는 한국어로 출력하세요.";

/// Fixed instruction sent next to the image.
pub fn instruction(variant: SchemaVariant) -> String {
    let mut text = String::from(INSTRUCTION_HEAD);
    if variant == SchemaVariant::Extended {
        text.push_str(INSTRUCTION_EXTENDED);
    }
    text.push_str(INSTRUCTION_TAIL);
    text
}

/// `responseSchema` for Gemini structured output.
pub fn response_schema(variant: SchemaVariant) -> Value {
    let mut properties = json!({
        "foodName": { "type": "STRING", "description": "음식 이름 (한국어)" },
        "totalCalories": { "type": "NUMBER", "description": "추정 총 칼로리 (kcal)" },
        "macros": {
            "type": "OBJECT",
            "properties": {
                "protein": { "type": "NUMBER", "description": "단백질 (g)" },
                "carbs": { "type": "NUMBER", "description": "탄수화물 (g)" },
                "fat": { "type": "NUMBER", "description": "지방 (g)" }
            },
            "required": ["protein", "carbs", "fat"]
        },
        "healthTip": { "type": "STRING", "description": "건강 팁" },
        "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
        "isFood": { "type": "BOOLEAN" }
    });

    if variant == SchemaVariant::Extended {
        if let Some(map) = properties.as_object_mut() {
            map.insert(
                "healthScore".to_string(),
                json!({ "type": "NUMBER", "description": "0~100 사이의 건강 점수" }),
            );
            map.insert(
                "tags".to_string(),
                json!({
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "음식 특징 태그 (예: #고단백)"
                }),
            );
            map.insert(
                "exercise".to_string(),
                json!({
                    "type": "OBJECT",
                    "properties": {
                        "walking": { "type": "NUMBER", "description": "걷기 소요 시간 (분)" },
                        "running": { "type": "NUMBER", "description": "달리기 소요 시간 (분)" },
                        "cycling": { "type": "NUMBER", "description": "자전거 타기 소요 시간 (분)" }
                    },
                    "required": ["walking", "running", "cycling"]
                }),
            );
        }
    }

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": variant.required_fields(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_required_matches_variant() {
        for variant in [SchemaVariant::Basic, SchemaVariant::Extended] {
            let schema = response_schema(variant);
            let required: Vec<&str> = schema["required"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap())
                .collect();

            assert_eq!(required, variant.required_fields());
            for field in required {
                assert!(
                    schema["properties"].get(field).is_some(),
                    "{} declared required but has no property",
                    field
                );
            }
        }
    }

    #[test]
    fn test_basic_schema_omits_extended_fields() {
        let schema = response_schema(SchemaVariant::Basic);
        assert!(schema["properties"].get("healthScore").is_none());
        assert!(!instruction(SchemaVariant::Basic).contains("건강 점수"));
        assert!(instruction(SchemaVariant::Extended).contains("운동 환산"));
    }
}
