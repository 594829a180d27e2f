//! Day-based views over the flat todo collection: list buckets, the active
//! span filter, tie-break ordering, colour summaries and ownership panels.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::{PERSONAL_TEAM_SENTINEL, Priority, Todo, TodoList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorColor {
    Red,
    Amber,
    Green,
}

impl IndicatorColor {
    pub fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::High => IndicatorColor::Red,
            Priority::Medium => IndicatorColor::Amber,
            Priority::Low => IndicatorColor::Green,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            IndicatorColor::Red => "#ef4444",
            IndicatorColor::Amber => "#f59e0b",
            IndicatorColor::Green => "#10b981",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorCount {
    pub priority: Priority,
    pub color: IndicatorColor,
    pub hex: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipSplit {
    pub team_todos: Vec<Todo>,
    pub personal_todos: Vec<Todo>,
}

impl OwnershipSplit {
    pub fn team_remaining(&self) -> usize {
        self.team_todos.iter().filter(|todo| !todo.completed).count()
    }

    pub fn personal_remaining(&self) -> usize {
        self.personal_todos.iter().filter(|todo| !todo.completed).count()
    }
}

/// Folds the flat collection into list buckets in first-seen order. The
/// first todo of each list decides its name and team.
pub fn group_by_list(todos: &[Todo]) -> Vec<TodoList> {
    let mut lists: Vec<TodoList> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for todo in todos {
        let position = *positions.entry(todo.todo_list_id).or_insert_with(|| {
            lists.push(TodoList::seeded_by(todo));
            lists.len() - 1
        });
        lists[position].todos.push(todo.clone());
    }

    lists
}

/// Priority rank, then incomplete before completed, then title.
pub fn compare_todos(a: &Todo, b: &Todo) -> Ordering {
    a.priority
        .rank()
        .cmp(&b.priority.rank())
        .then_with(|| a.completed.cmp(&b.completed))
        .then_with(|| compare_titles(&a.title, &b.title))
}

pub fn sort_todos(todos: &mut [Todo]) {
    todos.sort_by(compare_todos);
}

// Accent- and case-insensitive first, then case-insensitive, then raw.
fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lists that have at least one todo active on `day`, each holding only those
/// todos in display order.
pub fn todos_active_on(day: NaiveDate, todos: &[Todo]) -> Vec<TodoList> {
    group_by_list(todos)
        .into_iter()
        .filter_map(|mut list| {
            list.todos.retain(|todo| todo.is_active_on(day));
            if list.todos.is_empty() {
                return None;
            }
            sort_todos(&mut list.todos);
            Some(list)
        })
        .collect()
}

/// One entry per non-empty priority bucket, high to low. Counts are exact.
pub fn color_summary_for(day: NaiveDate, todos: &[Todo]) -> Vec<ColorCount> {
    let active = todos_active_on(day, todos);

    [Priority::High, Priority::Medium, Priority::Low]
        .into_iter()
        .filter_map(|priority| {
            let count = active
                .iter()
                .flat_map(|list| list.todos.iter())
                .filter(|todo| todo.priority == priority)
                .count();
            let color = IndicatorColor::for_priority(priority);
            (count > 0).then(|| ColorCount {
                priority,
                color,
                hex: color.hex(),
                count,
            })
        })
        .collect()
}

pub fn split_by_ownership(day: NaiveDate, todos: &[Todo]) -> OwnershipSplit {
    let mut split = OwnershipSplit::default();

    for list in todos_active_on(day, todos) {
        let team_list = list
            .team_id
            .is_some_and(|team_id| team_id > PERSONAL_TEAM_SENTINEL);
        for todo in list.todos {
            if todo.is_team_todo || team_list {
                split.team_todos.push(todo);
            } else {
                split.personal_todos.push(todo);
            }
        }
    }

    sort_todos(&mut split.team_todos);
    sort_todos(&mut split.personal_todos);
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{end_of_day, parse_day_key, start_of_day};
    use chrono::Duration;
    use proptest::prelude::*;

    fn day(value: &str) -> NaiveDate {
        parse_day_key(value).expect("valid day")
    }

    fn todo(id: i64, list: i64, start: &str, due: Option<&str>) -> Todo {
        Todo {
            id,
            title: format!("todo {id}"),
            completed: false,
            priority: Priority::Medium,
            todo_list_id: list,
            todo_list_name: format!("list {list}"),
            start_date: start_of_day(day(start)),
            due_date: due.map(|due| end_of_day(day(due))),
            is_team_todo: false,
            team_id: None,
        }
    }

    fn titled(id: i64, title: &str, priority: Priority, completed: bool) -> Todo {
        Todo {
            title: title.to_string(),
            priority,
            completed,
            ..todo(id, 1, "2024-06-01", None)
        }
    }

    #[test]
    fn multi_day_span_is_inclusive() {
        let mut high = todo(1, 1, "2024-06-01", Some("2024-06-03"));
        high.priority = Priority::High;
        let todos = vec![high];

        assert!(todos_active_on(day("2024-05-31"), &todos).is_empty());
        for active_day in ["2024-06-01", "2024-06-02", "2024-06-03"] {
            let lists = todos_active_on(day(active_day), &todos);
            assert_eq!(lists.len(), 1, "{active_day}");
            assert_eq!(lists[0].todos[0].id, 1);
        }
        assert!(todos_active_on(day("2024-06-04"), &todos).is_empty());
    }

    #[test]
    fn single_day_span_is_active_once() {
        let todos = vec![todo(1, 1, "2024-06-10", Some("2024-06-10"))];

        assert!(todos_active_on(day("2024-06-09"), &todos).is_empty());
        assert_eq!(todos_active_on(day("2024-06-10"), &todos).len(), 1);
        assert!(todos_active_on(day("2024-06-11"), &todos).is_empty());
    }

    #[test]
    fn no_due_date_means_start_day_only() {
        let todos = vec![todo(1, 1, "2024-06-10", None)];

        assert_eq!(todos_active_on(day("2024-06-10"), &todos).len(), 1);
        assert!(todos_active_on(day("2024-06-11"), &todos).is_empty());
    }

    #[test]
    fn groups_keep_first_seen_name_and_order() {
        let mut renamed = todo(3, 2, "2024-06-01", None);
        renamed.todo_list_name = "later name".to_string();
        let todos = vec![
            todo(1, 2, "2024-06-01", None),
            todo(2, 1, "2024-06-01", None),
            renamed,
        ];

        let lists = group_by_list(&todos);
        assert_eq!(lists.iter().map(|list| list.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(lists[0].name, "list 2");
        assert_eq!(lists[0].todos.len(), 2);
    }

    #[test]
    fn empty_buckets_are_dropped() {
        let todos = vec![
            todo(1, 1, "2024-06-01", None),
            todo(2, 2, "2024-06-05", None),
        ];

        let lists = todos_active_on(day("2024-06-05"), &todos);
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, 2);
    }

    #[test]
    fn tie_breaks_priority_then_completion_then_title() {
        let todos = vec![
            titled(1, "zebra", Priority::Low, false),
            titled(2, "banana", Priority::High, true),
            titled(3, "Apple", Priority::High, true),
            titled(4, "cherry", Priority::High, false),
            titled(5, "apple", Priority::Medium, false),
        ];

        let lists = todos_active_on(day("2024-06-01"), &todos);
        let order: Vec<i64> = lists[0].todos.iter().map(|todo| todo.id).collect();
        assert_eq!(order, vec![4, 3, 2, 5, 1]);
    }

    #[test]
    fn accented_titles_sort_with_their_base_letter() {
        let todos = vec![
            titled(1, "zebra", Priority::Medium, false),
            titled(2, "Éclair", Priority::Medium, false),
            titled(3, "eclair", Priority::Medium, false),
            titled(4, "éte", Priority::Medium, false),
            titled(5, "Echo", Priority::Medium, false),
        ];

        let lists = todos_active_on(day("2024-06-01"), &todos);
        let titles: Vec<&str> = lists[0].todos.iter().map(|todo| todo.title.as_str()).collect();
        assert_eq!(titles, vec!["Echo", "eclair", "Éclair", "éte", "zebra"]);
    }

    #[test]
    fn query_is_pure() {
        let todos = vec![
            titled(1, "b", Priority::Low, false),
            titled(2, "a", Priority::High, false),
        ];
        let before = todos.clone();

        let first = todos_active_on(day("2024-06-01"), &todos);
        let second = todos_active_on(day("2024-06-01"), &todos);
        assert_eq!(first, second);
        assert_eq!(todos, before);
    }

    #[test]
    fn color_summary_counts_are_exact() {
        let mut todos: Vec<Todo> = (1..=5)
            .map(|id| titled(id, "high", Priority::High, false))
            .collect();
        todos.push(titled(6, "low", Priority::Low, true));

        let summary = color_summary_for(day("2024-06-01"), &todos);
        assert_eq!(
            summary,
            vec![
                ColorCount {
                    priority: Priority::High,
                    color: IndicatorColor::Red,
                    hex: "#ef4444",
                    count: 5
                },
                ColorCount {
                    priority: Priority::Low,
                    color: IndicatorColor::Green,
                    hex: "#10b981",
                    count: 1
                },
            ]
        );
        assert!(color_summary_for(day("2024-06-02"), &todos).is_empty());
    }

    #[test]
    fn split_by_ownership_uses_flag_and_list_team() {
        let personal = todo(1, 1, "2024-06-01", None);
        let mut team = todo(1, 2, "2024-06-01", None);
        team.is_team_todo = true;
        team.team_id = Some(4);
        let mut team_list_only = todo(3, 3, "2024-06-01", None);
        team_list_only.team_id = Some(5);
        let mut sentinel_list = todo(4, 4, "2024-06-01", None);
        sentinel_list.team_id = Some(PERSONAL_TEAM_SENTINEL);
        let mut done = todo(5, 1, "2024-06-01", None);
        done.completed = true;

        let split = split_by_ownership(
            day("2024-06-01"),
            &[personal, team, team_list_only, sentinel_list, done],
        );

        let team_ids: Vec<i64> = split.team_todos.iter().map(|todo| todo.id).collect();
        let personal_ids: Vec<i64> = split.personal_todos.iter().map(|todo| todo.id).collect();
        assert_eq!(team_ids, vec![1, 3]);
        assert_eq!(personal_ids, vec![1, 4, 5]);
        assert_eq!(split.team_remaining(), 2);
        assert_eq!(split.personal_remaining(), 2);
    }

    fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
    }

    proptest! {
        #[test]
        fn active_iff_inside_span(
            start_offset in 0i64..60,
            span in proptest::option::of(0i64..10),
            query_offset in 0i64..80,
        ) {
            let origin = day("2024-01-01");
            let start = origin + Duration::days(start_offset);
            let query = origin + Duration::days(query_offset);
            let mut subject = todo(1, 1, "2024-01-01", None);
            subject.start_date = start_of_day(start);
            subject.due_date = span.map(|span| end_of_day(start + Duration::days(span)));

            let expected = match span {
                Some(span) => start <= query && query <= start + Duration::days(span),
                None => start == query,
            };
            let found = !todos_active_on(query, &[subject]).is_empty();
            prop_assert_eq!(found, expected);
        }

        #[test]
        fn higher_priority_always_precedes(
            rows in proptest::collection::vec((arb_priority(), any::<bool>(), "[a-zA-Z]{0,6}"), 1..25)
        ) {
            let todos: Vec<Todo> = rows
                .iter()
                .enumerate()
                .map(|(index, (priority, completed, title))| {
                    titled(index as i64, title, *priority, *completed)
                })
                .collect();

            for list in todos_active_on(day("2024-06-01"), &todos) {
                for pair in list.todos.windows(2) {
                    prop_assert!(pair[0].priority.rank() <= pair[1].priority.rank());
                    if pair[0].priority == pair[1].priority {
                        prop_assert!(pair[0].completed <= pair[1].completed);
                    }
                }
            }
        }
    }
}
