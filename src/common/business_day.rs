// src/common/business_day.rs

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

/// Janela [início, fim] de um dia no fuso local do servidor, com fim inclusivo
/// (23:59:59.999).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_local_date(date: NaiveDate) -> Self {
        let start = local_midnight(date);
        let end = local_midnight(date + Days::new(1)) - TimeDelta::milliseconds(1);
        Self { date, start, end }
    }

    /// O "hoje" do fechamento de caixa. Não há como escolher outro dia.
    pub fn today() -> Self {
        Self::for_local_date(Local::now().date_naive())
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    // Em dias com horário de verão a meia-noite pode não existir; cai para UTC.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = DayWindow::today();

        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
        assert!(!window.contains(window.start - TimeDelta::milliseconds(1)));
        assert!(!window.contains(window.end + TimeDelta::milliseconds(1)));
    }

    #[test]
    fn test_today_contains_now() {
        assert!(DayWindow::today().contains(Utc::now()));
    }

    #[test]
    fn test_consecutive_days_do_not_overlap() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let today = DayWindow::for_local_date(date);
        let tomorrow = DayWindow::for_local_date(date + Days::new(1));

        assert_eq!(today.end + TimeDelta::milliseconds(1), tomorrow.start);
    }
}
