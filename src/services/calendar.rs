use std::iter;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dates;
use crate::models::{Todo, TodoList};
use crate::services::aggregation::{
    ColorCount, IndicatorColor, OwnershipSplit, color_summary_for, split_by_ownership,
    todos_active_on,
};

/// Dots a day cell paints before collapsing the rest into a `+N` badge.
pub const MAX_VISIBLE_INDICATORS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    pub day_key: String,
    pub day: u32,
    pub is_today: bool,
    pub is_selected: bool,
    /// Exact number of active todos.
    pub total: usize,
    pub summary: Vec<ColorCount>,
    /// At most [`MAX_VISIBLE_INDICATORS`] dots.
    pub indicators: Vec<IndicatorColor>,
    pub overflow: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st, Sunday-first.
    pub leading_blanks: u32,
    pub days_in_month: u32,
    pub previous_month: NaiveDate,
    pub next_month: NaiveDate,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPanel {
    #[serde(flatten)]
    pub list: TodoList,
    pub remaining: usize,
    pub total: usize,
}

/// Everything the selected-day panels show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: NaiveDate,
    pub day_key: String,
    pub is_today: bool,
    pub lists: Vec<ListPanel>,
    #[serde(flatten)]
    pub ownership: OwnershipSplit,
    pub team_remaining: usize,
    pub personal_remaining: usize,
}

/// Cosmetic cap over an exact summary: the dots to paint and the overflow.
pub fn cell_indicators(summary: &[ColorCount]) -> (Vec<IndicatorColor>, usize) {
    let total: usize = summary.iter().map(|entry| entry.count).sum();
    let indicators: Vec<IndicatorColor> = summary
        .iter()
        .flat_map(|entry| iter::repeat_n(entry.color, entry.count))
        .take(MAX_VISIBLE_INDICATORS)
        .collect();
    let overflow = total - indicators.len();
    (indicators, overflow)
}

pub fn build_day_cell(date: NaiveDate, selected: NaiveDate, today: NaiveDate, todos: &[Todo]) -> DayCell {
    let summary = color_summary_for(date, todos);
    let (indicators, overflow) = cell_indicators(&summary);

    DayCell {
        date,
        day_key: dates::format_day_key(&date),
        day: date.day(),
        is_today: dates::is_same_day(&date, &today),
        is_selected: dates::is_same_day(&date, &selected),
        total: summary.iter().map(|entry| entry.count).sum(),
        summary,
        indicators,
        overflow,
    }
}

pub fn build_month(anchor: NaiveDate, selected: NaiveDate, today: NaiveDate, todos: &[Todo]) -> MonthView {
    let first = dates::shift_month(anchor, 0);
    let days_in_month = dates::days_in_month(&first);

    let days = first
        .iter_days()
        .take(days_in_month as usize)
        .map(|date| build_day_cell(date, selected, today, todos))
        .collect();

    MonthView {
        year: first.year(),
        month: first.month(),
        leading_blanks: dates::first_weekday_of_month(&first),
        days_in_month,
        previous_month: dates::shift_month(first, -1),
        next_month: dates::shift_month(first, 1),
        days,
    }
}

pub fn build_day_view(day: NaiveDate, todos: &[Todo]) -> DayView {
    let lists = todos_active_on(day, todos)
        .into_iter()
        .map(|list| ListPanel {
            remaining: list.remaining(),
            total: list.todos.len(),
            list,
        })
        .collect();
    let ownership = split_by_ownership(day, todos);

    DayView {
        date: day,
        day_key: dates::format_day_key(&day),
        is_today: dates::is_today(&day),
        lists,
        team_remaining: ownership.team_remaining(),
        personal_remaining: ownership.personal_remaining(),
        ownership,
    }
}
