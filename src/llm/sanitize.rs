/// Strips code-fence artifacts from a model completion, leaving the bare
/// statement.
///
/// Purely textual: backticks are removed, a leading `sql` language tag is
/// dropped, and the ends are trimmed. Prose around the query survives, and
/// nothing checks that the remainder is valid SQL.
pub fn sanitize_response(raw: &str) -> String {
    let without_fences = raw.replace('`', "");
    let mut sql = without_fences.trim();

    // A ```sql fence collapses to a bare leading language tag once the
    // backticks are gone.
    if let Some(tag) = sql.get(..3) {
        if tag.eq_ignore_ascii_case("sql") {
            sql = sql[3..].trim_start();
        }
    }

    sql.to_string()
}
