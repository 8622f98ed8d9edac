//! Assembly of the complete compilable program from session state.
//!
//! Fixed order: include directives first (so they stay textually valid),
//! then the function buffer (definitions visible to `main`), then the live
//! statements inside `main`, executing top to bottom.

use crate::core::history::History;

/// Produce the full source text handed to the compiler.
pub fn full_source(history: &History, functions: &[String]) -> String {
    let mut source = String::new();
    for include in history.live_includes() {
        source.push_str(include);
        source.push('\n');
    }
    for line in functions {
        source.push_str(line);
        source.push('\n');
    }
    source.push_str("int main(void) {\n");
    for statement in history.live_statements() {
        source.push_str("    ");
        source.push_str(statement);
        source.push('\n');
    }
    source.push_str("    return 0;\n}\n");
    source
}
