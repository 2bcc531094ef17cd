use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Five-field nutrition estimate for one analyzed food image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub name: String,
    pub calories: f64,
    pub protein: f64, // g
    pub carbs: f64,   // g
    pub fat: f64,     // g
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub image: String,
}

/// Error body returned by the analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64, // creation time, unix millis
    pub image: Option<String>,
    pub name: String,
    pub date: DateTime<Utc>,
    pub eaten: bool,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl FoodEntry {
    pub fn macros(&self) -> MacroTotals {
        MacroTotals {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl std::ops::AddAssign for MacroTotals {
    fn add_assign(&mut self, other: Self) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroGoals {
    pub calories: f64, // kcal
    pub protein: f64,  // g
    pub carbs: f64,    // g
    pub fat: f64,      // g
}

impl Default for MacroGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 200.0,
            fat: 55.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub diet: String,
    pub goals: MacroGoals,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            height_cm: 175.0,
            weight_kg: 70.0,
            diet: "Balanced".to_string(),
            goals: MacroGoals::default(),
        }
    }
}

impl UserProfile {
    /// Body mass index rounded to one decimal.
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        if height_m <= 0.0 {
            return 0.0;
        }
        let bmi = self.weight_kg / (height_m * height_m);
        (bmi * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_bmi() {
        let profile = UserProfile::default();
        assert_eq!(profile.bmi(), 22.9);
    }

    #[test]
    fn test_bmi_zero_height() {
        let profile = UserProfile {
            height_cm: 0.0,
            ..UserProfile::default()
        };
        assert_eq!(profile.bmi(), 0.0);
    }

    #[test]
    fn test_estimate_rejects_missing_field() {
        let json = r#"{"name": "Salad", "calories": 120, "protein": 3, "carbs": 10}"#;
        assert!(serde_json::from_str::<NutritionEstimate>(json).is_err());
    }

    #[test]
    fn test_estimate_rejects_string_number() {
        let json = r#"{"name": "Salad", "calories": "120", "protein": 3, "carbs": 10, "fat": 4}"#;
        assert!(serde_json::from_str::<NutritionEstimate>(json).is_err());
    }
}
