//! Process-wide registration log.
//!
//! Every successful registration is recorded with the object family, the
//! produced type, the key, and the multi flag. The log is observability
//! only; nothing reads it to make decisions.

use std::io::{self, Write};
use std::sync::OnceLock;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

static LOG: OnceLock<Mutex<Vec<RegistrationRecord>>> = OnceLock::new();

fn log() -> &'static Mutex<Vec<RegistrationRecord>> {
    LOG.get_or_init(|| Mutex::new(Vec::new()))
}

/// One successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Object family the registry produces, e.g. `Box<dyn OdeSolver>`.
    pub object_type: String,
    /// Concrete type produced by the registered creator.
    pub class_name: String,
    /// Key the creator was bound to.
    pub key: String,
    /// Whether multi-valued binding was requested.
    pub multi: bool,
}

impl RegistrationRecord {
    pub fn new(object_type: &str, class_name: &str, key: String, multi: bool) -> Self {
        Self {
            object_type: short_type_name(object_type),
            class_name: short_type_name(class_name),
            key,
            multi,
        }
    }
}

pub(crate) fn log_registration(record: RegistrationRecord) {
    tracing::debug!(
        object = %record.object_type,
        class = %record.class_name,
        key = %record.key,
        multi = record.multi,
        "factory registration"
    );
    log().lock().push(record);
}

/// Snapshot of every registration made so far, in order.
pub fn registration_log() -> Vec<RegistrationRecord> {
    log().lock().clone()
}

/// Writes the registration log, one line per record.
pub fn print_registration_log(out: &mut impl Write) -> io::Result<()> {
    for record in log().lock().iter() {
        let kind = if record.multi { "template class" } else { "class" };
        writeln!(
            out,
            "{} {} {} registered as {}",
            record.object_type, kind, record.class_name, record.key
        )?;
    }
    Ok(())
}

/// Strips module paths from a type name:
/// `alloc::boxed::Box<dyn vireo_scene::OdeSolver>` → `Box<dyn OdeSolver>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push(c);
            segment_start = out.len();
        }
    }
    out
}
