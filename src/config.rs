use std::{fs, path};

use bitcoin::Txid;
use bitcoincore_rpc::Auth as RpcAuth;
use dirs::home_dir;
use log::Level;
use structopt::StructOpt;

use crate::error::{Context, OptionExt, Result};

const DEFAULT_RPC_PORT: u16 = 9902;

#[derive(StructOpt, Debug)]
#[structopt(about = "Read the files of the Great Library of Peercoin")]
pub struct Config {
    // cannot be set using an env var, it does not play nicely with from_occurrences
    #[structopt(
        short,
        long,
        help = "increase verbosity level (up to 3 times)",
        parse(from_occurrences),
        display_order(99)
    )]
    pub verbose: usize,

    #[structopt(
        short = "d",
        long = "peercoind-dir",
        help = "path to peercoind directory (used for the config and cookie files) [default: ~/.ppcoin]",
        env,
        hide_env_values(true),
        display_order(30)
    )]
    pub peercoind_dir: Option<path::PathBuf>,

    #[structopt(
        long = "peercoind-conf",
        help = "peercoind config file to read rpc credentials and port from [default: <peercoind-dir>/ppcoin.conf]",
        env,
        hide_env_values(true),
        display_order(31)
    )]
    pub peercoind_conf: Option<path::PathBuf>,

    #[structopt(
        short = "u",
        long = "peercoind-url",
        help = "url for the peercoind rpc server [default: http://127.0.0.1:<rpcport or 9902>/]",
        env,
        hide_env_values(true),
        display_order(32)
    )]
    pub peercoind_url: Option<String>,

    #[structopt(
        short = "c",
        long = "peercoind-cred",
        help = "credentials for accessing the peercoind rpc server (as <username>:<password>, instead of reading the config file)",
        env,
        hide_env_values(true),
        display_order(33)
    )]
    pub peercoind_cred: Option<String>,

    #[structopt(
        short = "C",
        long = "peercoind-cookie",
        help = "cookie file for accessing the peercoind rpc server [default: <peercoind-dir>/.cookie]",
        env,
        hide_env_values(true),
        display_order(34)
    )]
    pub peercoind_cookie: Option<path::PathBuf>,

    #[structopt(
        long = "catalog",
        help = "json file with the catalog items [default: the built-in catalog]",
        env,
        hide_env_values(true),
        display_order(20)
    )]
    pub catalog: Option<path::PathBuf>,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// List the catalog items
    List,

    /// Display a text item
    Show {
        #[structopt(help = "catalog index or txid")]
        item: String,
    },

    /// Save an item to a file
    Export {
        #[structopt(help = "catalog index or txid")]
        item: String,

        #[structopt(
            short,
            long,
            help = "output path [default: <title>.<file-type> in the current directory]"
        )]
        output: Option<path::PathBuf>,
    },

    /// Extract the payload of an arbitrary transaction
    Extract {
        txid: Txid,

        #[structopt(
            short,
            long,
            help = "number of leading marker bytes to discard",
            default_value = "0"
        )]
        trim: usize,

        #[structopt(short = "z", long, help = "the payload is gzip compressed")]
        compressed: bool,

        #[structopt(short, long, help = "write to a file instead of stdout")]
        output: Option<path::PathBuf>,
    },
}

/// The rpc related settings of a ppcoin.conf file
#[derive(Debug, Default, PartialEq)]
pub struct NodeConf {
    pub rpcuser: Option<String>,
    pub rpcpassword: Option<String>,
    pub rpcport: Option<u16>,
}

impl NodeConf {
    pub fn parse(contents: &str) -> Result<Self> {
        let mut conf = NodeConf::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let (key, val) = match (parts.next(), parts.next()) {
                (Some(key), Some(val)) => (key.trim(), val.trim()),
                _ => continue,
            };
            match key {
                "rpcuser" => conf.rpcuser = Some(val.into()),
                "rpcpassword" => conf.rpcpassword = Some(val.into()),
                "rpcport" => {
                    conf.rpcport = Some(val.parse().context("invalid rpcport")?)
                }
                _ => (),
            }
        }
        Ok(conf)
    }

    pub fn from_path(path: &path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed reading node config {:?}", path))?;
        Self::parse(&contents).with_context(|| format!("invalid node config {:?}", path))
    }
}

impl Config {
    pub fn dotenv() {
        dirs::home_dir().map(|home| dotenv::from_path(home.join("great-library.env")).ok());
    }

    pub fn peercoind_dir(&self) -> Option<path::PathBuf> {
        self.peercoind_dir
            .clone()
            .or_else(|| Some(home_dir()?.join(".ppcoin")))
    }

    /// Read the node config file, if one is available
    pub fn node_conf(&self) -> Result<Option<NodeConf>> {
        let path = match &self.peercoind_conf {
            // an explicitly configured file must exist
            Some(path) => return Ok(Some(NodeConf::from_path(path)?)),
            None => match self.peercoind_dir() {
                Some(dir) => dir.join("ppcoin.conf"),
                None => return Ok(None),
            },
        };
        if path.exists() {
            Ok(Some(NodeConf::from_path(&path)?))
        } else {
            debug!("node config not found in {:?}", path);
            Ok(None)
        }
    }

    pub fn peercoind_url(&self, node_conf: Option<&NodeConf>) -> String {
        self.peercoind_url.clone().unwrap_or_else(|| {
            format!(
                "http://127.0.0.1:{}/",
                node_conf
                    .and_then(|conf| conf.rpcport)
                    .unwrap_or(DEFAULT_RPC_PORT)
            )
        })
    }

    pub fn peercoind_auth(&self, node_conf: Option<&NodeConf>) -> Result<RpcAuth> {
        Ok(self
            .peercoind_cred
            .as_ref()
            .and_then(|cred| {
                let mut parts = cred.splitn(2, ':');
                Some(RpcAuth::UserPass(parts.next()?.into(), parts.next()?.into()))
            })
            .or_else(|| {
                let conf = node_conf?;
                Some(RpcAuth::UserPass(
                    conf.rpcuser.clone()?,
                    conf.rpcpassword.clone()?,
                ))
            })
            .or_else(|| {
                let cookie = self.peercoind_cookie.clone().or_else(|| get_cookie(self))?;
                Some(RpcAuth::CookieFile(cookie))
            })
            .or_err("\"rpcuser\" and \"rpcpassword\" must be set in your ppcoin.conf file, or specify credentials or a cookie file")?)
    }

    pub fn setup_logger(&self) {
        pretty_env_logger::formatted_builder()
            .filter_module(
                "great_library",
                match self.verbose {
                    0 => Level::Warn,
                    1 => Level::Info,
                    2 => Level::Debug,
                    _ => Level::Trace,
                }
                .to_level_filter(),
            )
            .filter_module(
                "bitcoincore_rpc",
                match self.verbose {
                    0 | 1 => Level::Warn,
                    2 => Level::Debug,
                    _ => Level::Trace,
                }
                .to_level_filter(),
            )
            .filter_level(
                match self.verbose {
                    0 | 1 => Level::Warn,
                    2 => Level::Info,
                    _ => Level::Debug,
                }
                .to_level_filter(),
            )
            .init();
    }
}

fn get_cookie(config: &Config) -> Option<path::PathBuf> {
    let cookie = config.peercoind_dir()?.join(".cookie");
    if cookie.exists() {
        Some(cookie)
    } else {
        debug!("cookie file not found in {:?}", cookie);
        None
    }
}
