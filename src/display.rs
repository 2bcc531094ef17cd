use std::fmt::Write;

use crate::models::{FoodEntry, MacroGoals, MacroTotals, NutritionEstimate, UserProfile};

fn macro_card(title: &str, value: f64, unit: &str, goal: f64) -> String {
    let percent = if goal > 0.0 { value / goal * 100.0 } else { 0.0 };
    format!(
        "{:<9}{:>7.0} {:<5}({:.0}% of {:.0} {})",
        format!("{}:", title),
        value,
        unit,
        percent,
        goal,
        unit
    )
}

fn macro_cards(macros: &MacroTotals, goals: &MacroGoals) -> Vec<String> {
    vec![
        macro_card("Calories", macros.calories, "kcal", goals.calories),
        macro_card("Protein", macros.protein, "g", goals.protein),
        macro_card("Carbs", macros.carbs, "g", goals.carbs),
        macro_card("Fat", macros.fat, "g", goals.fat),
    ]
}

pub fn render_estimate(estimate: &NutritionEstimate, goals: &MacroGoals) -> String {
    let macros = MacroTotals {
        calories: estimate.calories,
        protein: estimate.protein,
        carbs: estimate.carbs,
        fat: estimate.fat,
    };

    let mut out = format!("🍽️  {}\n", estimate.name);
    for card in macro_cards(&macros, goals) {
        let _ = writeln!(out, "   {}", card);
    }
    out
}

pub fn render_history(entries: &[FoodEntry], eaten: &MacroTotals, profile: &UserProfile) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "👤 {} cm, {} kg, BMI {:.1}, diet: {}",
        profile.height_cm,
        profile.weight_kg,
        profile.bmi(),
        profile.diet
    );

    if entries.is_empty() {
        out.push_str("\nNo food recorded yet. Run `nutrisnap analyze <IMAGE>` to add one.\n");
        return out;
    }

    out.push_str("\n📜 Food History\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "[{}] {} {} ({})",
            if entry.eaten { "x" } else { " " },
            entry.id,
            entry.name,
            entry.date.format("%b %-d, %Y")
        );
        let _ = writeln!(
            out,
            "      {:.0} kcal | P {:.0} g | C {:.0} g | F {:.0} g",
            entry.calories, entry.protein, entry.carbs, entry.fat
        );
    }

    out.push_str("\n🎯 Eaten vs daily goals\n");
    for card in macro_cards(eaten, &profile.goals) {
        let _ = writeln!(out, "   {}", card);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_macro_card_percentage() {
        let card = macro_card("Protein", 75.0, "g", 150.0);
        assert!(card.starts_with("Protein:"));
        assert!(card.contains("(50% of 150 g)"));
    }

    #[test]
    fn test_render_estimate() {
        let estimate = NutritionEstimate {
            name: "Lentil Soup".to_string(),
            calories: 500.0,
            protein: 18.0,
            carbs: 60.0,
            fat: 11.0,
        };

        let out = render_estimate(&estimate, &MacroGoals::default());

        assert!(out.contains("Lentil Soup"));
        assert!(out.contains("(25% of 2000 kcal)"));
        assert!(out.contains("(20% of 55 g)"));
    }

    #[test]
    fn test_render_history() {
        let entry = FoodEntry {
            id: 1700000000000,
            image: None,
            name: "Simit".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap(),
            eaten: true,
            calories: 280.0,
            protein: 9.0,
            carbs: 50.0,
            fat: 5.0,
        };
        let eaten = entry.macros();

        let out = render_history(&[entry], &eaten, &UserProfile::default());

        assert!(out.contains("BMI 22.9"));
        assert!(out.contains("[x] 1700000000000 Simit (Mar 5, 2024)"));
        assert!(out.contains("(14% of 2000 kcal)"));
    }

    #[test]
    fn test_render_empty_history() {
        let out = render_history(&[], &MacroTotals::default(), &UserProfile::default());
        assert!(out.contains("No food recorded yet"));
    }
}
