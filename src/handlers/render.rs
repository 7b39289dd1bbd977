use super::session::{Phase, Session};
use crate::models::AnalysisResult;

const SHOWN_INGREDIENTS: usize = 3;

pub const IDLE_PROMPT: &str = "📷 *음식 사진 업로드*\n\
     이미지 경로를 입력하거나 터미널로 드래그하세요 (JPG, PNG, WEBP)";

pub const INVALID_FILE_ALERT: &str = "⚠️ 이미지 파일만 업로드할 수 있습니다. (JPG, PNG, WEBP)";

/// Text panel for the current session state.
pub fn render(session: &Session) -> String {
    match session.phase() {
        Phase::Idle => IDLE_PROMPT.to_string(),
        Phase::Loading => {
            let size_kb = session.selected_image().map_or(0, |img| img.len() / 1024);
            format!(
                "⏳ AI가 음식을 분석하고 있습니다... ({} KB)\n   약 5-10초 정도 소요됩니다.",
                size_kb
            )
        }
        Phase::Success(result) => render_result(result),
        Phase::Error(err) => {
            let (icon, action) = if err.is_quota_exceeded() {
                ("⌛", "잠시 후 'reset' 입력 뒤 다시 시도하기")
            } else {
                ("❗", "'reset' 입력 후 다른 사진 시도하기")
            };
            format!("{} {}\n\n↩️ {}", icon, err.message, action)
        }
    }
}

pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("🍽️ *{}*\n", result.food_name));
    out.push_str(&format_ingredients(&result.ingredients));
    out.push_str(&format!("\n🔥 총 칼로리: {:.0} kcal\n\n", result.total_calories));

    let macros = &result.macros;
    out.push_str(&format!(
        "단백질 {:.0}g | 탄수화물 {:.0}g | 지방 {:.0}g\n",
        macros.protein, macros.carbs, macros.fat
    ));
    for (label, grams) in [
        ("단백질  ", macros.protein),
        ("탄수화물", macros.carbs),
        ("지방    ", macros.fat),
    ] {
        let bar = create_progress_bar(macros.share(grams), 100.0);
        out.push_str(&format!("{} {} {}%\n", label, bar.bar, bar.percentage));
    }

    if let Some(score) = result.health_score {
        let bar = create_progress_bar(score, 100.0);
        out.push_str(&format!("\n💚 건강 점수: {:.0}/100\n{}\n", score, bar.bar));
    }

    if let Some(tags) = result.tags.as_ref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("\n🏷️ {}\n", tags.join(" ")));
    }

    out.push_str(&format!("\nℹ️ 건강 팁\n{}\n", result.health_tip));

    if let Some(exercise) = result.exercise {
        out.push_str(&format!(
            "\n🏃 이 칼로리를 소모하려면\n\
             걷기 {:.0}분 · 달리기 {:.0}분 · 자전거 {:.0}분\n",
            exercise.walking, exercise.running, exercise.cycling
        ));
    }

    out.push_str("\n↩️ 'reset' 입력 후 다른 사진 분석하기");
    out
}

fn format_ingredients(ingredients: &[String]) -> String {
    if ingredients.is_empty() {
        return String::new();
    }

    let shown = ingredients
        .iter()
        .take(SHOWN_INGREDIENTS)
        .map(|i| format!("[{}]", i))
        .collect::<Vec<_>>()
        .join(" ");

    if ingredients.len() > SHOWN_INGREDIENTS {
        format!("{} +{} 개 더보기\n", shown, ingredients.len() - SHOWN_INGREDIENTS)
    } else {
        format!("{}\n", shown)
    }
}

struct ProgressBar {
    bar: String,
    percentage: i32,
}

fn create_progress_bar(current: f64, goal: f64) -> ProgressBar {
    let percentage = if goal <= 0.0 {
        0
    } else {
        ((current / goal) * 100.0).clamp(0.0, 100.0).round() as i32
    };
    let filled = (percentage / 10) as usize; // 10 segments
    let empty = 10 - filled;

    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));

    ProgressBar { bar, percentage }
}
