use std::process;

use log::error;
use structopt::StructOpt;

use great_library::error::fmt_error_chain;
use great_library::{App, Config};

fn main() {
    Config::dotenv();
    let config = Config::from_args();
    config.setup_logger();

    if let Err(e) = App::boot(config).and_then(|app| app.run()) {
        error!("{:?}", e);
        eprintln!("error: {}", fmt_error_chain(&e));
        process::exit(1);
    }
}
