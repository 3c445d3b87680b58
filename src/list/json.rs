//! Machine-readable task listing
//!
//! Editors and completion scripts consume this document, so field names and
//! their order are part of the interface.

use crate::list::ListError;
use crate::task::{DecoratedTask, Location, NamespaceNode};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::io::Write;

impl Serialize for DecoratedTask<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let task = self.task;
        let fields = if self.up_to_date.is_some() { 7 } else { 6 };

        let mut state = serializer.serialize_struct("Task", fields)?;
        state.serialize_field("name", task.name())?;
        state.serialize_field("task", &task.task)?;
        state.serialize_field("desc", &task.desc)?;
        state.serialize_field("summary", &task.summary)?;
        state.serialize_field("aliases", &task.aliases)?;
        match self.up_to_date {
            Some(up_to_date) => state.serialize_field("upToDate", &up_to_date)?,
            None => state.skip_field("upToDate")?,
        }
        state.serialize_field("location", &task.location.as_ref().map(JsonLocation))?;
        state.end()
    }
}

struct JsonLocation<'a>(&'a Location);

impl Serialize for JsonLocation<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Location", 3)?;
        state.serialize_field("line", &self.0.line)?;
        state.serialize_field("column", &self.0.column)?;
        state.serialize_field("taskfile", &self.0.taskfile)?;
        state.end()
    }
}

/// Write `root` as indented JSON followed by a newline
pub fn write_json<W: Write>(root: &NamespaceNode<'_>, mut writer: W) -> Result<(), ListError> {
    serde_json::to_writer_pretty(&mut writer, root)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
