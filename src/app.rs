use std::io::{self, Write};
use std::sync::Arc;

use bitcoincore_rpc::Client as RpcClient;

use crate::config::Command;
use crate::source::RpcTxSource;
use crate::viewer::{FileExporter, Presenter, TextViewer};
use crate::{Catalog, Config, Extractor, Result};

pub struct App {
    config: Config,
    catalog: Catalog,
    extractor: Extractor<RpcTxSource>,
}

impl App {
    pub fn boot(config: Config) -> Result<Self> {
        debug!("{:?}", config);

        let catalog = match &config.catalog {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin(),
        };
        info!("loaded catalog with {} items", catalog.len());

        let node_conf = config.node_conf()?;
        let rpc = Arc::new(RpcClient::new(
            config.peercoind_url(node_conf.as_ref()),
            config.peercoind_auth(node_conf.as_ref())?,
        )?);
        let extractor = Extractor::new(RpcTxSource::new(rpc));

        Ok(App {
            config,
            catalog,
            extractor,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn extractor(&self) -> &Extractor<RpcTxSource> {
        &self.extractor
    }

    /// Run the configured command, blocking until it completes
    pub fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        match &self.config.command {
            Command::List => write_listing(&self.catalog, stdout.lock()),

            Command::Show { item } => {
                let item = self.catalog.select(item)?;
                let payload = self.extractor.fetch(item)?;
                let mut viewer = TextViewer::new(stdout.lock());
                viewer.present(item, &payload)
            }

            Command::Export { item, output } => {
                let item = self.catalog.select(item)?;
                let payload = self.extractor.fetch(item)?;
                let mut exporter = FileExporter::new(output.clone());
                exporter.present(item, &payload)?;
                if let Some(path) = exporter.written() {
                    println!("saved \"{}\" to {}", item.title, path.display());
                }
                Ok(())
            }

            Command::Extract {
                txid,
                trim,
                compressed,
                output,
            } => {
                let payload = self.extractor.extract(txid, *compressed, *trim)?;
                match output {
                    Some(path) => std::fs::write(path, &payload)?,
                    None => stdout.lock().write_all(&payload)?,
                }
                Ok(())
            }
        }
    }
}

/// Print the catalog, one entry per item with its index
pub fn write_listing(catalog: &Catalog, mut out: impl Write) -> Result<()> {
    for (index, item) in catalog.items().iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {} by {} [{}]\n     tx {}",
            index,
            item.title,
            item.authors_line(),
            item.file_type,
            item.txid
        )?;
    }
    Ok(())
}
