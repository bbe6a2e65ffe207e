//! Built-in lifestyle medicine questionnaire
//!
//! Six categories covering the pillars of lifestyle medicine. Point tables are
//! discrete design data: "lower is better" questions are expressed by the
//! ordering of their tables, never by extra logic in the engine.

use super::question::{Band, CategorySpec, QuestionKind, QuestionSpec, Step};
use crate::types::{Answer, Gender};

pub const SLEEP: &str = "sleep";
pub const NUTRITION: &str = "nutrition";
pub const PHYSICAL_ACTIVITY: &str = "physical_activity";
pub const STRESS_MANAGEMENT: &str = "stress_management";
pub const SOCIAL_CONNECTIONS: &str = "social_connections";
pub const SCREEN_TIME: &str = "screen_time";

const SLEEP_MAX: u32 = 12;
const NUTRITION_MAX: u32 = 20;
const PHYSICAL_ACTIVITY_MAX: u32 = 16;
const STRESS_MANAGEMENT_MAX: u32 = 15;
const SOCIAL_CONNECTIONS_MAX: u32 = 15;
const SCREEN_TIME_MAX: u32 = 11;

const FREQUENCY_UP: &[&str] = &["Never", "Rarely", "Sometimes", "Usually", "Daily"];
const FREQUENCY_DOWN: &[&str] = &["Always", "Usually", "Sometimes", "Rarely", "Never"];

/// Categories of the built-in questionnaire, in presentation order
pub fn categories() -> Vec<CategorySpec> {
    vec![
        sleep(),
        nutrition(),
        physical_activity(),
        stress_management(),
        social_connections(),
        screen_time(),
    ]
}

fn sleep() -> CategorySpec {
    CategorySpec::new(
        SLEEP,
        "Sleep",
        SLEEP_MAX,
        vec![
            QuestionSpec::new(
                "sleep_consistency",
                SLEEP,
                "How consistent is your sleep schedule (going to bed and waking up at similar times)?",
                QuestionKind::linear_choice(
                    &[
                        "Very inconsistent",
                        "Somewhat inconsistent",
                        "Neutral",
                        "Somewhat consistent",
                        "Very consistent",
                    ],
                    false,
                ),
            ),
            QuestionSpec::new(
                "sleep_quality",
                SLEEP,
                "How would you rate your overall sleep quality?",
                QuestionKind::linear_choice(&["Very poor", "Poor", "Fair", "Good", "Excellent"], false),
            ),
            QuestionSpec::new(
                "screen_before_bed",
                SLEEP,
                "How often do you use screens (phone, TV, computer) within 1 hour before bed?",
                QuestionKind::linear_choice(FREQUENCY_DOWN, false),
            ),
        ],
    )
}

fn nutrition() -> CategorySpec {
    CategorySpec::new(
        NUTRITION,
        "Nutrition",
        NUTRITION_MAX,
        vec![
            QuestionSpec::new(
                "fruits",
                NUTRITION,
                "How many servings of fruit do you eat daily?",
                QuestionKind::optimal_slider(0.0, 8.0, "servings", Band::new(2.0, 4.0), 3, 1.0, 1),
            ),
            QuestionSpec::new(
                "vegetables",
                NUTRITION,
                "How many servings of vegetables do you eat daily?",
                QuestionKind::optimal_slider(0.0, 10.0, "servings", Band::new(3.0, 5.0), 3, 1.0, 1),
            ),
            QuestionSpec::new(
                "water_intake",
                NUTRITION,
                "How many glasses of water do you drink daily?",
                QuestionKind::stepped_slider(
                    0.0,
                    15.0,
                    "glasses",
                    &[Step::new(3.0, 0), Step::new(5.0, 1), Step::new(7.0, 2), Step::new(15.0, 3)],
                ),
            ),
            QuestionSpec::new(
                "processed_foods",
                NUTRITION,
                "How often do you eat highly processed or fast foods?",
                QuestionKind::linear_choice(
                    &["Multiple times daily", "Once daily", "Few times weekly", "Rarely", "Never"],
                    false,
                ),
            ),
            QuestionSpec::new(
                "breakfast",
                NUTRITION,
                "How often do you eat breakfast?",
                QuestionKind::linear_choice(&["Never", "Rarely", "Sometimes", "Usually", "Every day"], false),
            ),
            QuestionSpec::new(
                "iron_rich_foods",
                NUTRITION,
                "How often do you eat iron-rich foods (leafy greens, beans, lean meat, fortified cereal)?",
                QuestionKind::linear_choice(
                    &["Rarely", "1-2 days a week", "3-4 days a week", "Most days"],
                    false,
                ),
            )
            .gender_variant(
                Gender::Female,
                "Iron needs rise during menstruation. How often do you eat iron-rich foods (leafy greens, beans, lean meat, fortified cereal)?",
            ),
        ],
    )
}

fn physical_activity() -> CategorySpec {
    CategorySpec::new(
        PHYSICAL_ACTIVITY,
        "Physical Activity",
        PHYSICAL_ACTIVITY_MAX,
        vec![
            QuestionSpec::new(
                "exercise_frequency",
                PHYSICAL_ACTIVITY,
                "How many days per week do you engage in moderate to vigorous physical activity?",
                QuestionKind::optimal_slider(0.0, 7.0, "days", Band::new(5.0, 7.0), 4, 2.0, 2),
            ),
            QuestionSpec::new(
                "exercise_duration",
                PHYSICAL_ACTIVITY,
                "On days you exercise, how many minutes do you typically exercise?",
                QuestionKind::optimal_slider(0.0, 120.0, "minutes", Band::new(60.0, 90.0), 3, 30.0, 1),
            ),
            QuestionSpec::new(
                "sedentary_time",
                PHYSICAL_ACTIVITY,
                "How many hours per day do you spend sitting (excluding sleep)?",
                QuestionKind::stepped_slider(
                    0.0,
                    16.0,
                    "hours",
                    &[Step::new(6.0, 3), Step::new(8.0, 2), Step::new(10.0, 1), Step::new(16.0, 0)],
                ),
            ),
            QuestionSpec::new(
                "active_transportation",
                PHYSICAL_ACTIVITY,
                "How often do you walk or bike for transportation?",
                QuestionKind::linear_choice(&["Never", "Rarely", "Sometimes", "Usually", "Always"], false),
            ),
            QuestionSpec::new(
                "strength_training",
                PHYSICAL_ACTIVITY,
                "Do you do any muscle-strengthening activity (weights, push-ups, climbing)?",
                QuestionKind::yes_no(2, 0),
            ),
            QuestionSpec::new(
                "strength_days",
                PHYSICAL_ACTIVITY,
                "How many days per week do you do strength training?",
                QuestionKind::stepped_slider(1.0, 7.0, "days", &[Step::new(2.0, 0), Step::new(7.0, 1)]),
            )
            .depends_on("strength_training", Answer::yes()),
        ],
    )
}

fn stress_management() -> CategorySpec {
    CategorySpec::new(
        STRESS_MANAGEMENT,
        "Stress Management",
        STRESS_MANAGEMENT_MAX,
        vec![
            QuestionSpec::new(
                "stress_level",
                STRESS_MANAGEMENT,
                "How would you rate your overall stress level?",
                QuestionKind::linear_choice(&["Extremely high", "High", "Moderate", "Low", "Very low"], false),
            ),
            QuestionSpec::new(
                "stress_coping",
                STRESS_MANAGEMENT,
                "How often do you practice stress management techniques (meditation, deep breathing, journaling)?",
                QuestionKind::linear_choice(FREQUENCY_UP, false),
            ),
            QuestionSpec::new(
                "overwhelmed",
                STRESS_MANAGEMENT,
                "How often do you feel overwhelmed by your responsibilities?",
                QuestionKind::linear_choice(FREQUENCY_DOWN, false),
            ),
            QuestionSpec::new(
                "relaxation_time",
                STRESS_MANAGEMENT,
                "How much time do you dedicate to relaxation or hobbies daily?",
                QuestionKind::optimal_slider(0.0, 5.0, "hours", Band::new(1.0, 2.0), 3, 1.0, 1),
            ),
        ],
    )
}

fn social_connections() -> CategorySpec {
    CategorySpec::new(
        SOCIAL_CONNECTIONS,
        "Social Connections",
        SOCIAL_CONNECTIONS_MAX,
        vec![
            QuestionSpec::new(
                "meaningful_conversations",
                SOCIAL_CONNECTIONS,
                "How often do you have meaningful conversations with friends or family?",
                QuestionKind::linear_choice(FREQUENCY_UP, false),
            ),
            QuestionSpec::new(
                "social_support",
                SOCIAL_CONNECTIONS,
                "How supported do you feel by your social network?",
                QuestionKind::linear_choice(&["Not at all", "Slightly", "Moderately", "Very", "Extremely"], false),
            ),
            QuestionSpec::new(
                "social_activities",
                SOCIAL_CONNECTIONS,
                "How many times per week do you engage in social activities?",
                QuestionKind::optimal_slider(0.0, 15.0, "times", Band::new(3.0, 7.0), 3, 2.0, 1),
            ),
            QuestionSpec::new(
                "loneliness",
                SOCIAL_CONNECTIONS,
                "How often do you feel lonely?",
                QuestionKind::linear_choice(FREQUENCY_DOWN, false),
            ),
        ],
    )
}

fn screen_time() -> CategorySpec {
    CategorySpec::new(
        SCREEN_TIME,
        "Screen Time",
        SCREEN_TIME_MAX,
        vec![
            QuestionSpec::new(
                "daily_screen_time",
                SCREEN_TIME,
                "How many hours per day do you spend on screens for non-school/work purposes?",
                QuestionKind::stepped_slider(
                    0.0,
                    16.0,
                    "hours",
                    &[
                        Step::new(2.0, 4),
                        Step::new(4.0, 3),
                        Step::new(6.0, 2),
                        Step::new(8.0, 1),
                        Step::new(16.0, 0),
                    ],
                ),
            ),
            QuestionSpec::new(
                "social_media",
                SCREEN_TIME,
                "How much time do you spend on social media daily?",
                QuestionKind::stepped_slider(
                    0.0,
                    8.0,
                    "hours",
                    &[Step::new(1.0, 3), Step::new(2.0, 2), Step::new(4.0, 1), Step::new(8.0, 0)],
                ),
            ),
            QuestionSpec::new(
                "screen_breaks",
                SCREEN_TIME,
                "How often do you take breaks from screens?",
                QuestionKind::linear_choice(&["Never", "Rarely", "Sometimes", "Usually", "Very frequently"], false),
            ),
        ],
    )
}
