use serde::Serialize;
use time::{Date, Duration};

/// One labeled day of the weekly view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayCount {
    pub weekday: String,
    pub readings: i64,
}

/// The Monday of the week containing `today`.
pub fn week_start(today: Date) -> Date {
    today - Duration::days(i64::from(today.weekday().number_days_from_monday()))
}

/// Expands sparse per-day counts into a dense Monday..Sunday week starting
/// at `start`. Days without readings report 0; days outside the week are
/// ignored.
pub fn dense_week(start: Date, per_day: &[(Date, i64)]) -> Vec<WeekdayCount> {
    (0..7)
        .map(|offset| {
            let day = start + Duration::days(offset);
            let readings = per_day
                .iter()
                .find(|(d, _)| *d == day)
                .map(|&(_, n)| n)
                .unwrap_or(0);
            WeekdayCount {
                weekday: day.weekday().to_string(),
                readings,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn week_start_is_monday_for_every_weekday() {
        let monday = date!(2026 - 08 - 03);
        for offset in 0..7 {
            let day = monday + Duration::days(offset);
            assert_eq!(week_start(day), monday, "offset {offset}");
        }
    }

    #[test]
    fn week_start_of_a_monday_is_itself() {
        assert_eq!(week_start(date!(2026 - 08 - 03)), date!(2026 - 08 - 03));
    }

    #[test]
    fn empty_input_yields_seven_zeroed_days() {
        let week = dense_week(date!(2026 - 08 - 03), &[]);
        assert_eq!(week.len(), 7);
        assert!(week.iter().all(|d| d.readings == 0));
        let labels: Vec<_> = week.iter().map(|d| d.weekday.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday"
            ]
        );
    }

    #[test]
    fn counts_land_on_their_weekday() {
        let start = date!(2026 - 08 - 03);
        let per_day = [
            (date!(2026 - 08 - 04), 3),
            (date!(2026 - 08 - 09), 1),
        ];
        let week = dense_week(start, &per_day);
        assert_eq!(week[1].weekday, "Tuesday");
        assert_eq!(week[1].readings, 3);
        assert_eq!(week[6].weekday, "Sunday");
        assert_eq!(week[6].readings, 1);
        assert_eq!(week.iter().map(|d| d.readings).sum::<i64>(), 4);
    }

    #[test]
    fn days_outside_the_week_are_ignored() {
        let start = date!(2026 - 08 - 03);
        let per_day = [(date!(2026 - 07 - 30), 9)];
        let week = dense_week(start, &per_day);
        assert!(week.iter().all(|d| d.readings == 0));
    }
}
