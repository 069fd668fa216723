use std::io::BufRead;
use std::sync::{Arc, mpsc};
use std::thread;

use anyhow::{Context, Result, anyhow};
use canonical_email::{CanonicalView, Canonicalizer, MxOutcome, PendingLookup};

use crate::args::Cli;
use crate::output::{EditRow, write_edit};
use crate::transport::Transport;

/// Replays stdin lines as successive edits of one input field.
///
/// Lookups run on worker threads; results that arrive for a domain the
/// input has moved away from are cached but not displayed. Returns the view
/// once every lookup has settled.
pub fn run<B: BufRead>(
    canonicalizer: Arc<Canonicalizer<Transport>>,
    input: B,
    cli: &Cli,
) -> Result<CanonicalView> {
    let (tx, rx) = mpsc::channel::<(PendingLookup, MxOutcome)>();
    let mut session = canonicalizer.session();
    let mut workers = Vec::new();

    for line in input.lines() {
        let line = line.context("read stdin")?;

        for (pending, outcome) in rx.try_iter() {
            session.complete(pending, outcome);
        }

        if let Some(pending) = session.set_address(&line) {
            let canonicalizer = Arc::clone(&canonicalizer);
            let tx = tx.clone();
            workers.push(thread::spawn(move || {
                let outcome = canonicalizer.lookup(&pending);
                // receiver outlives every worker
                let _ = tx.send((pending, outcome));
            }));
        }

        let view = session.view();
        write_edit(&EditRow { input: &line, view: &view }, cli)?;
    }

    drop(tx);
    for (pending, outcome) in rx {
        session.complete(pending, outcome);
    }
    for worker in workers {
        worker
            .join()
            .map_err(|_| anyhow!("MX lookup worker panicked"))?;
    }

    let view = session.view();
    let input = session.address().to_string();
    write_edit(&EditRow { input: &input, view: &view }, cli)?;
    Ok(view)
}
