use serde::Serialize;

use super::config::VariantConfig;
use super::domain::{DiagnosisResult, Rank};

/// Display-ready view of a diagnosis: the engine output plus the texts it selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisReport {
    pub variant: String,
    #[serde(flatten)]
    pub result: DiagnosisResult,
    pub gap_comment: String,
    pub advice: String,
}

impl DiagnosisReport {
    pub fn compose(result: DiagnosisResult, config: &VariantConfig) -> Self {
        let advice = config
            .advice
            .text(result.advice_key)
            .unwrap_or_default()
            .to_string();
        let gap_comment = gap_comment(result.offset);

        Self {
            variant: config.name.clone(),
            result,
            gap_comment,
            advice,
        }
    }

    pub fn rank(&self) -> Rank {
        self.result.rank
    }

    pub fn render_lines(&self) -> Vec<String> {
        let result = &self.result;
        let mut lines = vec![
            format!("診断結果 ({})", self.variant),
            format!("トーン: {}", result.tone),
            format!("実年齢: {} 歳", result.age),
            format!("見た目年齢（推定）: {} 歳", result.visual_age),
            format!("見た目年齢ギャップ: {:+} 歳", result.offset),
        ];

        for score in &result.sub_scores {
            lines.push(format!("{}: {}/10", score.name, format_score(score.value)));
        }

        lines.push(format!("総合ランク: {} (平均 {})", result.rank, result.average));
        lines.push(String::new());
        lines.push(self.gap_comment.clone());
        lines.push(self.advice.clone());
        lines
    }
}

/// Comment on how the tone shifts the perceived age.
pub fn gap_comment(offset: i32) -> String {
    if offset > 0 {
        format!(
            "現在の歯のトーンでは、見た目年齢が実年齢よりも約{offset}歳高く見られている可能性があります。 \
             明るいトーンへ改善することで、より若々しく清潔感のある印象が期待できます。"
        )
    } else {
        "現在の歯のトーンは非常に良好で、実年齢よりも若く見られる可能性があります。\
         この状態をぜひ維持していきましょう。"
            .to_string()
    }
}

fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_comment_mentions_years_when_tone_ages_the_face() {
        let comment = gap_comment(3);
        assert!(comment.contains("約3歳高く"));
    }

    #[test]
    fn gap_comment_praises_neutral_and_bright_tones() {
        assert_eq!(gap_comment(0), gap_comment(-8));
        assert!(gap_comment(0).contains("非常に良好"));
    }

    #[test]
    fn scores_render_without_trailing_zeroes() {
        assert_eq!(format_score(5.0), "5");
        assert_eq!(format_score(9.2), "9.2");
    }
}
