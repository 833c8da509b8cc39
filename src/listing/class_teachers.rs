//! Teachers assigned to a scheduled class

use crate::graphql::queries::{SCHEDULE_ITEM_TEACHERS, SCHEDULE_ITEM_TEACHERS_QUERY};
use crate::listing::ListQuery;
use crate::models::ScheduleItemTeacher;

pub fn class_teachers_query(schedule_item_id: &str, page_size: usize) -> ListQuery<ScheduleItemTeacher> {
    ListQuery::new(SCHEDULE_ITEM_TEACHERS, SCHEDULE_ITEM_TEACHERS_QUERY, "scheduleItemTeachers")
        .with_variable("scheduleItem", schedule_item_id)
        .with_page_size(page_size)
}

pub fn role_label(role: Option<&str>) -> &'static str {
    match role {
        Some("SUB") => "Subteacher",
        Some("ASSISTANT") => "Assistant",
        Some("KARMA") => "Karma teacher",
        _ => "",
    }
}

/// Display columns for one assignment
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherRow {
    pub date_start: String,
    pub date_end: String,
    pub teacher: String,
    pub teacher2: String,
}

impl From<&ScheduleItemTeacher> for TeacherRow {
    fn from(assignment: &ScheduleItemTeacher) -> Self {
        let with_role = |name: &str, role: Option<&str>| match role_label(role) {
            "" => name.to_string(),
            label => format!("{} ({})", name, label),
        };

        Self {
            date_start: assignment.date_start.format("%Y-%m-%d").to_string(),
            date_end: assignment
                .date_end
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            teacher: with_role(&assignment.account.full_name, assignment.role.as_deref()),
            teacher2: assignment
                .account2
                .as_ref()
                .map(|a| with_role(&a.full_name, assignment.role2.as_deref()))
                .unwrap_or_default(),
        }
    }
}
