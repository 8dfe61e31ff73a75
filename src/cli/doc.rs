//! Doc command implementation

use std::process::ExitCode;

use super::{fail, load_context, EXIT_SUCCESS};
use crate::doc::prepare_doc_site;

/// Run the doc command
pub fn run_doc(verbose: bool) -> ExitCode {
    let context = match load_context(None, None, verbose) {
        Ok(ctx) => ctx,
        Err(e) => return fail("Error loading config", &e),
    };

    match prepare_doc_site(&context) {
        Ok(site) => {
            if site.cleaned {
                println!("Cleaned {}", site.dir.display());
            }
            println!("Copied doc script to {}", site.script.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => fail("Doc failed", &e),
    }
}
