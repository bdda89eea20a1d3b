use tracing::debug;

use crate::users::{dto::UserView, error::UserError, repo::UserStore};

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const CSV_FILENAME: &str = "users.csv";
pub const CSV_HEADER: [&str; 3] = ["Facebook ID", "Full Name", "Email"];

const LINE_END: &str = "\r\n";

/// Renders every stored user as a CSV document with a header row.
pub async fn export_users(store: &dyn UserStore) -> Result<String, UserError> {
    let users: Vec<UserView> = store
        .list_all()
        .await?
        .into_iter()
        .map(UserView::from)
        .collect();
    debug!(rows = users.len(), "exporting users");
    Ok(render_csv(&users))
}

pub fn render_csv(users: &[UserView]) -> String {
    let mut out = String::new();
    write_row(&mut out, CSV_HEADER);
    for user in users {
        write_row(&mut out, user.fields());
    }
    out
}

fn write_row(out: &mut String, fields: [&str; 3]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str(LINE_END);
}

/// Minimal quoting: only fields holding a delimiter, quote or line break.
fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
