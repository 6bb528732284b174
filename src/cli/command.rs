/// One command-line request, independent of the argument parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List {
        filter_json: Option<String>,
    },
    Stats,
    Get {
        id: String,
    },
    SetState {
        id: String,
        state: String,
        token: String,
        // write the data file back after a successful change
        save: bool,
    },
    Explain {
        filter_json: Option<String>,
    },
    Health,
    Metrics,
    CheckOrigin {
        origin: String,
    },
}
