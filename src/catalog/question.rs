//! Question and category definitions
//!
//! Every question is one of three closed kinds (slider, choice, yes/no). Each
//! kind carries its own input constraints and a discrete point table; scoring
//! is a lookup into that table.

use serde::{Deserialize, Serialize};

use crate::types::{Answer, Gender, YesNo};

/// Inclusive numeric range on a slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from `value` to the nearest edge (0 inside the band)
    pub fn distance(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

/// One row of a monotonic slider table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Values at or below this bound (and above the previous row) earn `points`
    pub up_to: f64,
    pub points: u32,
}

impl Step {
    pub const fn new(up_to: f64, points: u32) -> Self {
        Self { up_to, points }
    }
}

/// Point table for a slider question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SliderScoring {
    /// Peaks inside `band`; `partial` within `tolerance` of it; zero beyond
    Optimal {
        band: Band,
        points: u32,
        tolerance: f64,
        partial: u32,
    },
    /// Ascending rows; the first row whose `up_to` covers the value wins
    Steps { steps: Vec<Step> },
}

impl SliderScoring {
    /// Points for a slider value, or `None` when no row covers it
    pub fn lookup(&self, value: f64) -> Option<u32> {
        match self {
            SliderScoring::Optimal {
                band,
                points,
                tolerance,
                partial,
            } => {
                let distance = band.distance(value);
                if distance == 0.0 {
                    Some(*points)
                } else if distance <= *tolerance {
                    Some(*partial)
                } else {
                    Some(0)
                }
            }
            SliderScoring::Steps { steps } => steps
                .iter()
                .find(|step| value <= step.up_to)
                .map(|step| step.points),
        }
    }

    pub fn best_points(&self) -> u32 {
        match self {
            SliderScoring::Optimal {
                points, partial, ..
            } => (*points).max(*partial),
            SliderScoring::Steps { steps } => {
                steps.iter().map(|s| s.points).max().unwrap_or(0)
            }
        }
    }
}

/// Input constraints and point table, one variant per answer type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Slider {
        min: f64,
        max: f64,
        unit: String,
        scoring: SliderScoring,
    },
    Choice {
        options: Vec<String>,
        /// Points per option, parallel to `options`
        scores: Vec<u32>,
    },
    YesNo {
        yes: u32,
        no: u32,
    },
}

impl QuestionKind {
    pub fn slider(min: f64, max: f64, unit: &str, scoring: SliderScoring) -> Self {
        QuestionKind::Slider {
            min,
            max,
            unit: unit.to_string(),
            scoring,
        }
    }

    /// Slider whose points peak inside an optimal band
    pub fn optimal_slider(
        min: f64,
        max: f64,
        unit: &str,
        band: Band,
        points: u32,
        tolerance: f64,
        partial: u32,
    ) -> Self {
        Self::slider(
            min,
            max,
            unit,
            SliderScoring::Optimal {
                band,
                points,
                tolerance,
                partial,
            },
        )
    }

    /// Slider scored by a monotonic table
    pub fn stepped_slider(min: f64, max: f64, unit: &str, steps: &[Step]) -> Self {
        Self::slider(
            min,
            max,
            unit,
            SliderScoring::Steps {
                steps: steps.to_vec(),
            },
        )
    }

    /// Choice with an explicit point table
    pub fn choice(options: &[&str], scores: &[u32]) -> Self {
        QuestionKind::Choice {
            options: options.iter().map(|o| o.to_string()).collect(),
            scores: scores.to_vec(),
        }
    }

    /// Choice scored `0..n` by option index, or `n-1..0` when `reversed`
    pub fn linear_choice(options: &[&str], reversed: bool) -> Self {
        let n = options.len() as u32;
        let scores: Vec<u32> = if reversed {
            (0..n).rev().collect()
        } else {
            (0..n).collect()
        };
        Self::choice(options, &scores)
    }

    pub fn yes_no(yes: u32, no: u32) -> Self {
        QuestionKind::YesNo { yes, no }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::Slider { .. } => "slider",
            QuestionKind::Choice { .. } => "choice",
            QuestionKind::YesNo { .. } => "yes_no",
        }
    }
}

/// Applicability condition on another question's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub question_id: String,
    pub required: Answer,
}

/// Alternate wording shown to respondents of one gender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderVariant {
    pub trigger: Gender,
    pub alt_prompt: String,
}

/// A single question in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub id: String,
    pub category_id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Dependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_variant: Option<GenderVariant>,
}

impl QuestionSpec {
    pub fn new(id: &str, category_id: &str, prompt: &str, kind: QuestionKind) -> Self {
        Self {
            id: id.to_string(),
            category_id: category_id.to_string(),
            prompt: prompt.to_string(),
            kind,
            depends_on: None,
            gender_variant: None,
        }
    }

    /// Only applicable when `question_id` was answered with `required`
    pub fn depends_on(mut self, question_id: &str, required: Answer) -> Self {
        self.depends_on = Some(Dependency {
            question_id: question_id.to_string(),
            required,
        });
        self
    }

    /// Show `alt_prompt` instead of the default wording to `trigger`
    pub fn gender_variant(mut self, trigger: Gender, alt_prompt: &str) -> Self {
        self.gender_variant = Some(GenderVariant {
            trigger,
            alt_prompt: alt_prompt.to_string(),
        });
        self
    }

    pub fn is_dependent(&self) -> bool {
        self.depends_on.is_some()
    }

    /// Prompt text to display for a respondent of the given gender.
    ///
    /// Display only: the point table is the same for every respondent.
    pub fn prompt_for(&self, gender: Option<Gender>) -> &str {
        match (&self.gender_variant, gender) {
            (Some(variant), Some(g)) if variant.trigger == g => &variant.alt_prompt,
            _ => &self.prompt,
        }
    }

    /// Highest value the point table can yield
    pub fn best_points(&self) -> u32 {
        match &self.kind {
            QuestionKind::Slider { scoring, .. } => scoring.best_points(),
            QuestionKind::Choice { scores, .. } => scores.iter().copied().max().unwrap_or(0),
            QuestionKind::YesNo { yes, no } => (*yes).max(*no),
        }
    }

    /// Whether `answer` is a well-formed answer to this question
    pub fn accepts(&self, answer: &Answer) -> bool {
        match &self.kind {
            QuestionKind::Slider { min, max, .. } => answer
                .as_number()
                .map(|v| v >= *min && v <= *max)
                .unwrap_or(false),
            QuestionKind::Choice { options, .. } => answer
                .as_index()
                .map(|i| i < options.len())
                .unwrap_or(false),
            QuestionKind::YesNo { .. } => answer.as_flag().is_some(),
        }
    }

    /// Points the table assigns to `answer`, or `None` if the lookup does not resolve
    pub fn points_for(&self, answer: &Answer) -> Option<u32> {
        match &self.kind {
            QuestionKind::Slider { scoring, .. } => scoring.lookup(answer.as_number()?),
            QuestionKind::Choice { scores, .. } => scores.get(answer.as_index()?).copied(),
            QuestionKind::YesNo { yes, no } => match answer.as_flag()? {
                YesNo::Yes => Some(*yes),
                YesNo::No => Some(*no),
            },
        }
    }

    /// Display label for an answer (option text, value with unit, yes/no)
    pub fn describe_answer(&self, answer: &Answer) -> String {
        match &self.kind {
            QuestionKind::Slider { unit, .. } => format!("{answer} {unit}"),
            QuestionKind::Choice { options, .. } => answer
                .as_index()
                .and_then(|i| options.get(i))
                .cloned()
                .unwrap_or_else(|| answer.to_string()),
            QuestionKind::YesNo { .. } => match answer.as_flag() {
                Some(YesNo::Yes) => "Yes".to_string(),
                Some(YesNo::No) => "No".to_string(),
                None => answer.to_string(),
            },
        }
    }
}

/// A thematic group of questions producing one normalized score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub id: String,
    pub label: String,
    /// Sum of the best points over non-dependent questions
    pub max_attainable_points: u32,
    pub questions: Vec<QuestionSpec>,
}

impl CategorySpec {
    pub fn new(id: &str, label: &str, max_attainable_points: u32, questions: Vec<QuestionSpec>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            max_attainable_points,
            questions,
        }
    }

    /// Best points summed over non-dependent questions
    pub fn derived_max_points(&self) -> u32 {
        self.questions
            .iter()
            .filter(|q| !q.is_dependent())
            .map(QuestionSpec::best_points)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_question() -> QuestionSpec {
        QuestionSpec::new(
            "fruits",
            "nutrition",
            "How many servings of fruit do you eat daily?",
            QuestionKind::optimal_slider(0.0, 8.0, "servings", Band::new(2.0, 4.0), 3, 1.0, 1),
        )
    }

    #[test]
    fn test_optimal_slider_lookup() {
        let q = fruit_question();
        assert_eq!(q.points_for(&Answer::value(3.0)), Some(3));
        assert_eq!(q.points_for(&Answer::value(2.0)), Some(3));
        assert_eq!(q.points_for(&Answer::value(1.0)), Some(1));
        assert_eq!(q.points_for(&Answer::value(5.0)), Some(1));
        assert_eq!(q.points_for(&Answer::value(8.0)), Some(0));
        assert_eq!(q.best_points(), 3);
    }

    #[test]
    fn test_stepped_slider_lookup() {
        let scoring = SliderScoring::Steps {
            steps: vec![Step::new(2.0, 4), Step::new(4.0, 3), Step::new(16.0, 0)],
        };
        assert_eq!(scoring.lookup(0.0), Some(4));
        assert_eq!(scoring.lookup(2.0), Some(4));
        assert_eq!(scoring.lookup(3.5), Some(3));
        assert_eq!(scoring.lookup(16.0), Some(0));
        assert_eq!(scoring.lookup(17.0), None);
        assert_eq!(scoring.best_points(), 4);
    }

    #[test]
    fn test_linear_choice_tables() {
        let forward = QuestionKind::linear_choice(&["a", "b", "c"], false);
        let reversed = QuestionKind::linear_choice(&["a", "b", "c"], true);

        assert_eq!(forward, QuestionKind::choice(&["a", "b", "c"], &[0, 1, 2]));
        assert_eq!(reversed, QuestionKind::choice(&["a", "b", "c"], &[2, 1, 0]));
    }

    #[test]
    fn test_accepts_checks_shape_and_range() {
        let slider = fruit_question();
        assert!(slider.accepts(&Answer::value(0.0)));
        assert!(!slider.accepts(&Answer::value(9.0)));
        assert!(!slider.accepts(&Answer::yes()));

        let choice = QuestionSpec::new("q", "c", "?", QuestionKind::linear_choice(&["a", "b"], false));
        assert!(choice.accepts(&Answer::index(1)));
        assert!(!choice.accepts(&Answer::index(2)));
        assert!(!choice.accepts(&Answer::value(0.5)));

        let yes_no = QuestionSpec::new("q", "c", "?", QuestionKind::yes_no(2, 0));
        assert!(yes_no.accepts(&Answer::no()));
        assert!(!yes_no.accepts(&Answer::index(0)));
    }

    #[test]
    fn test_prompt_for_gender_variant() {
        let q = QuestionSpec::new("iron", "nutrition", "Default wording", QuestionKind::yes_no(1, 0))
            .gender_variant(Gender::Female, "Alternate wording");

        assert_eq!(q.prompt_for(None), "Default wording");
        assert_eq!(q.prompt_for(Some(Gender::Male)), "Default wording");
        assert_eq!(q.prompt_for(Some(Gender::Female)), "Alternate wording");
    }

    #[test]
    fn test_derived_max_skips_dependent_questions() {
        let category = CategorySpec::new(
            "physical_activity",
            "Physical Activity",
            2,
            vec![
                QuestionSpec::new("strength", "physical_activity", "?", QuestionKind::yes_no(2, 0)),
                QuestionSpec::new(
                    "strength_days",
                    "physical_activity",
                    "?",
                    QuestionKind::linear_choice(&["1", "2", "3+"], false),
                )
                .depends_on("strength", Answer::yes()),
            ],
        );
        assert_eq!(category.derived_max_points(), 2);
    }

    #[test]
    fn test_describe_answer() {
        let q = fruit_question();
        assert_eq!(q.describe_answer(&Answer::value(3.0)), "3 servings");

        let choice = QuestionSpec::new("q", "c", "?", QuestionKind::linear_choice(&["Never", "Daily"], false));
        assert_eq!(choice.describe_answer(&Answer::index(1)), "Daily");
    }
}
