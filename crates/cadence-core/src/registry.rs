//! Program and user registration.
//!
//! CRUD the engine reads from, kept here so the boundary layer has a
//! validated path for creating programs and members.

use std::cmp::Ordering;

use tracing::info;

use crate::error::{BusinessRuleError, CoreError, Result, ValidationError};
use crate::model::{EventTime, NewProgram, Program, ProgramPatch, User};
use crate::storage::Directory;

pub struct ProgramRegistry<'a> {
    directory: &'a dyn Directory,
}

impl<'a> ProgramRegistry<'a> {
    pub fn new(directory: &'a dyn Directory) -> Self {
        Self { directory }
    }

    /// Register a program. Names are unique within their channel; the start
    /// date is normalized to the first instant of its day so day-one
    /// activities always fall inside the window.
    pub fn create(&self, program: NewProgram) -> Result<Program> {
        if self
            .directory
            .find_program_by_name_and_channel(&program.name, &program.slack_channel)?
            .is_some()
        {
            return Err(BusinessRuleError::DuplicateEntity {
                entity: "Program",
                field: "name",
                value: program.name,
            }
            .into());
        }

        check_date_order(&program.start_date, program.end_date.as_ref())?;

        let program = NewProgram {
            start_date: program.start_date.at_start_of_day(),
            ..program
        };
        let created = self.directory.insert_program(&program)?;
        info!(program = %created.name, channel = %created.slack_channel, "program registered");
        Ok(created)
    }

    /// Apply a partial update, re-checking name collisions and date order
    /// over the merged result.
    pub fn update(&self, id: i64, patch: ProgramPatch) -> Result<Program> {
        let mut program = self
            .directory
            .find_program_by_id(id)?
            .ok_or_else(|| CoreError::not_found("Program", id))?;

        if let Some(name) = &patch.name {
            if *name != program.name {
                if let Some(existing) = self.directory.find_program_by_name(name)? {
                    if existing.id != id {
                        return Err(BusinessRuleError::DuplicateEntity {
                            entity: "Program",
                            field: "name",
                            value: name.clone(),
                        }
                        .into());
                    }
                }
            }
        }

        patch.merge_into(&mut program);
        check_date_order(&program.start_date, program.end_date.as_ref())?;

        self.directory.update_program(&program)?;
        Ok(program)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Program> {
        self.directory
            .find_program_by_name(name)?
            .ok_or_else(|| CoreError::not_found("Program", name))
    }

    pub fn find_by_channel(&self, slack_channel: &str) -> Result<Vec<Program>> {
        Ok(self.directory.find_programs_by_channel(slack_channel)?)
    }

    pub fn find_all(&self) -> Result<Vec<Program>> {
        Ok(self.directory.all_programs()?)
    }
}

fn check_date_order(start: &EventTime, end: Option<&EventTime>) -> Result<()> {
    if let Some(end) = end {
        if end.cmp_adopting_offset(start) != Ordering::Greater {
            return Err(ValidationError::ProgramDatesInverted.into());
        }
    }
    Ok(())
}

pub struct UserRegistry<'a> {
    directory: &'a dyn Directory,
}

impl<'a> UserRegistry<'a> {
    pub fn new(directory: &'a dyn Directory) -> Self {
        Self { directory }
    }

    /// Register a member explicitly. Slack ids are immutable identities, so
    /// re-registering one is rejected.
    pub fn register(&self, slack_id: &str, display_name: &str) -> Result<User> {
        if self.directory.find_user_by_slack_id(slack_id)?.is_some() {
            return Err(BusinessRuleError::DuplicateEntity {
                entity: "User",
                field: "slack_id",
                value: slack_id.to_string(),
            }
            .into());
        }
        Ok(self.directory.create_user(slack_id, display_name)?)
    }

    pub fn find_by_slack_id(&self, slack_id: &str) -> Result<User> {
        self.directory
            .find_user_by_slack_id(slack_id)?
            .ok_or_else(|| CoreError::not_found("User", slack_id))
    }

    pub fn find_all(&self) -> Result<Vec<User>> {
        Ok(self.directory.all_users()?)
    }
}
