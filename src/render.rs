//! Rendering adapters for the weekly grid.
//!
//! The grid core only produces placement data; anything that wants to show
//! it implements [`GridRenderer`]. Two adapters ship with the binary: a
//! plain-text hour-by-weekday grid and pretty-printed JSON.

use crate::error::ScheduleError;
use crate::grid::WeekGrid;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const HOURS_PER_DAY: u32 = 24;

pub trait GridRenderer {
    fn render(&self, grid: &WeekGrid) -> Result<String, ScheduleError>;
}

/// 24-row by 7-column text grid followed by one card line per placement.
pub struct TextGrid;

impl TextGrid {
    fn cell_occupied(grid: &WeekGrid, weekday: u8, hour: u32) -> bool {
        grid.get(&weekday).is_some_and(|cards| {
            cards
                .iter()
                .any(|c| hour >= c.start_hour && hour < c.start_hour + c.span_hours)
        })
    }
}

impl GridRenderer for TextGrid {
    fn render(&self, grid: &WeekGrid) -> Result<String, ScheduleError> {
        let mut out = String::new();

        out.push_str("     ");
        for name in DAY_NAMES {
            out.push_str(&format!("{name:^5}"));
        }
        out.push('\n');

        for hour in 0..HOURS_PER_DAY {
            out.push_str(&format!("{hour:02}:00"));
            for weekday in 1..=7u8 {
                let mark = if Self::cell_occupied(grid, weekday, hour) {
                    "###"
                } else {
                    "."
                };
                out.push_str(&format!("{mark:^5}"));
            }
            out.push('\n');
        }

        for (weekday, cards) in grid {
            for card in cards {
                out.push_str(&format!(
                    "{} {:02}:00  {}  {}h  {} -> {}\n",
                    DAY_NAMES[usize::from(weekday - 1)],
                    card.start_hour,
                    card.date.format("%d.%m.%Y."),
                    card.total_duration_hours,
                    card.departure_name,
                    card.destination_name,
                ));
            }
        }

        Ok(out)
    }
}

/// Pretty-printed JSON of the weekday → placements map.
pub struct JsonRenderer;

impl GridRenderer for JsonRenderer {
    fn render(&self, grid: &WeekGrid) -> Result<String, ScheduleError> {
        serde_json::to_string_pretty(grid)
            .map_err(|e| ScheduleError::Payload(format!("serializing grid: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{TripRecord, build_week_grid};

    fn sample_grid() -> WeekGrid {
        // Monday 22:00 + 5h, splits into Monday 22-24 and Tuesday 00-03
        let trips = vec![TripRecord {
            departure_time: "2026-08-24T22:00:00Z".parse().unwrap(),
            duration_hours: 5,
            departure_name: "Zagreb".to_string(),
            destination_name: "Split".to_string(),
        }];
        build_week_grid(&trips).unwrap()
    }

    #[test]
    fn test_text_grid_shape() {
        let out = TextGrid.render(&sample_grid()).unwrap();
        let lines: Vec<_> = out.lines().collect();

        // header + 24 hour rows + 2 card lines
        assert_eq!(lines.len(), 1 + 24 + 2);
        assert!(lines[0].contains("Mon"));
        assert!(lines[0].contains("Sun"));
        assert!(lines[1].starts_with("00:00"));
        assert!(lines[24].starts_with("23:00"));
    }

    #[test]
    fn test_text_grid_marks_visible_hours() {
        let out = TextGrid.render(&sample_grid()).unwrap();

        // Monday shows 22:00 and 23:00, Tuesday shows 00:00-02:00
        let occupied = out.matches("###").count();
        assert_eq!(occupied, 5);
    }

    #[test]
    fn test_text_grid_card_lines_carry_trip_details() {
        let out = TextGrid.render(&sample_grid()).unwrap();

        assert!(out.contains("Mon 22:00  24.08.2026.  5h  Zagreb -> Split"));
        assert!(out.contains("Tue 00:00  25.08.2026.  5h  Zagreb -> Split"));
    }

    #[test]
    fn test_text_grid_empty_week() {
        let out = TextGrid.render(&WeekGrid::new()).unwrap();

        assert!(!out.contains("###"));
        assert_eq!(out.lines().count(), 25);
    }

    #[test]
    fn test_json_renderer_round_trips_keys() {
        let out = JsonRenderer.render(&sample_grid()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert!(value.get("1").is_some());
        assert!(value.get("2").is_some());
        assert_eq!(value["2"][0]["start_hour"], 0);
        assert_eq!(value["2"][0]["span_hours"], 3);
        assert_eq!(value["2"][0]["total_duration_hours"], 5);
    }
}
