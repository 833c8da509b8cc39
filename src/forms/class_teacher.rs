//! Add or edit a teacher assignment on a scheduled class

use chrono::Local;
use serde_json::{Map, Value};

use crate::forms::fields::{format_date, FieldKind, FieldSpec, FormValues};
use crate::forms::submission::{Operation, RecordForm};
use crate::forms::{blank_values, decode_record, with_id};
use crate::graphql::queries::{
    CREATE_SCHEDULE_ITEM_TEACHER, CREATE_SCHEDULE_ITEM_TEACHER_MUTATION, SCHEDULE_ITEM_TEACHER,
    SCHEDULE_ITEM_TEACHERS, SCHEDULE_ITEM_TEACHER_QUERY, UPDATE_SCHEDULE_ITEM_TEACHER,
    UPDATE_SCHEDULE_ITEM_TEACHER_MUTATION,
};
use crate::graphql::{ApiError, GraphQLRequest};
use crate::models::ScheduleItemTeacher;

pub const TEACHER_ROLES: &[&str] = &["SUB", "ASSISTANT", "KARMA"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("account", "Teacher", FieldKind::Reference).required(),
    FieldSpec::new("role", "Role", FieldKind::Choice(TEACHER_ROLES)),
    FieldSpec::new("account2", "Second teacher", FieldKind::Reference),
    FieldSpec::new("role2", "Second role", FieldKind::Choice(TEACHER_ROLES)),
    FieldSpec::new("dateStart", "Start date", FieldKind::Date).required(),
    FieldSpec::new("dateEnd", "End date", FieldKind::Date),
];

const REFETCH: &[&str] = &[SCHEDULE_ITEM_TEACHERS];

pub fn class_teachers_path(schedule_item_id: &str) -> String {
    format!("/schedule/classes/all/teachers/{}", schedule_item_id)
}

#[derive(Debug, Clone)]
pub struct ClassTeacherForm {
    schedule_item_id: String,
    /// `None` when adding a new assignment
    id: Option<String>,
}

impl ClassTeacherForm {
    pub fn add(schedule_item_id: impl Into<String>) -> Self {
        Self {
            schedule_item_id: schedule_item_id.into(),
            id: None,
        }
    }

    pub fn edit(schedule_item_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            schedule_item_id: schedule_item_id.into(),
            id: Some(id.into()),
        }
    }
}

impl RecordForm for ClassTeacherForm {
    fn title(&self) -> String {
        match self.id {
            Some(_) => "Edit class teacher".to_string(),
            None => "Add class teacher".to_string(),
        }
    }

    fn fields(&self) -> &[FieldSpec] {
        FIELDS
    }

    fn record_query(&self) -> Option<Operation> {
        let id = self.id.as_deref()?;
        Some(Operation::new(
            GraphQLRequest::new(SCHEDULE_ITEM_TEACHER, SCHEDULE_ITEM_TEACHER_QUERY).with_variable("id", id),
            "scheduleItemTeacher",
        ))
    }

    fn initial_values(&self, record: Option<&Value>) -> Result<FormValues, ApiError> {
        if self.id.is_none() {
            let today = Local::now().date_naive();
            return Ok(blank_values(FIELDS).with("dateStart", format_date(Some(today))));
        }

        let teacher: ScheduleItemTeacher = decode_record(record, "scheduleItemTeacher")?;
        Ok(FormValues::new()
            .with("account", teacher.account.id)
            .with("role", teacher.role.unwrap_or_default())
            .with("account2", teacher.account2.map(|a| a.id).unwrap_or_default())
            .with("role2", teacher.role2.unwrap_or_default())
            .with("dateStart", format_date(Some(teacher.date_start)))
            .with("dateEnd", format_date(teacher.date_end)))
    }

    fn mutation(&self, input: Map<String, Value>) -> Operation {
        match &self.id {
            Some(id) => Operation::new(
                GraphQLRequest::new(UPDATE_SCHEDULE_ITEM_TEACHER, UPDATE_SCHEDULE_ITEM_TEACHER_MUTATION)
                    .with_input(with_id(input, id)),
                "updateScheduleItemTeacher",
            ),
            None => {
                let mut input = input;
                input.insert(
                    "scheduleItem".to_string(),
                    Value::String(self.schedule_item_id.clone()),
                );
                Operation::new(
                    GraphQLRequest::new(CREATE_SCHEDULE_ITEM_TEACHER, CREATE_SCHEDULE_ITEM_TEACHER_MUTATION)
                        .with_input(input),
                    "createScheduleItemTeacher",
                )
            }
        }
    }

    fn success_message(&self) -> &str {
        match self.id {
            Some(_) => "Teacher saved",
            None => "Teacher added",
        }
    }

    fn return_path(&self) -> Option<String> {
        Some(class_teachers_path(&self.schedule_item_id))
    }

    fn refetch_queries(&self) -> &[&'static str] {
        REFETCH
    }
}
