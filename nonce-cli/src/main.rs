use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use nonce_core::{CipherChoice, CipherConfig, FactoryOpts, NonceBase};

/// nonce-core demo CLI: initializes one named factory and emits nonces.
#[derive(Parser)]
#[command(name = "noncectl")]
#[command(about = "CLI tool for driving a nonce-core factory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Machine ID to initialize the factory with (0..=511)
    #[arg(long, global = true, default_value_t = 0)]
    machine_id: u16,

    /// Registry name for the factory
    #[arg(long, global = true, default_value = "cli")]
    name: String,

    /// Base key, hex-encoded, at least 32 bytes decoded
    #[arg(long, global = true)]
    base_key_hex: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit one counter nonce
    Nonce {
        #[arg(long, default_value_t = 64)]
        width: u16,
    },
    /// Emit one sortable nonce
    Sortable {
        #[arg(long, default_value_t = 64)]
        width: u16,
    },
    /// Emit one encrypted nonce
    Encrypted {
        #[arg(long, default_value_t = 64)]
        width: u16,
        #[arg(long, value_enum, default_value_t = CipherArg::Blowfish)]
        cipher: CipherArg,
        #[arg(long, value_enum, default_value_t = BaseArg::Counter)]
        base: BaseArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CipherArg {
    Blowfish,
    Aes,
    TripleDes,
    Speck,
}

impl From<CipherArg> for CipherChoice {
    fn from(value: CipherArg) -> Self {
        match value {
            CipherArg::Blowfish => CipherChoice::Blowfish,
            CipherArg::Aes => CipherChoice::Aes,
            CipherArg::TripleDes => CipherChoice::TripleDes,
            CipherArg::Speck => CipherChoice::Speck,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BaseArg {
    Counter,
    Sortable,
}

impl From<BaseArg> for NonceBase {
    fn from(value: BaseArg) -> Self {
        match value {
            BaseArg::Counter => NonceBase::Counter,
            BaseArg::Sortable => NonceBase::Sortable,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let base_key = cli
        .base_key_hex
        .as_deref()
        .map(hex::decode)
        .transpose()
        .context("base_key_hex is not valid hex")?;

    let mut opts = FactoryOpts::new(cli.machine_id).with_name(cli.name.clone());
    if let Some(key) = base_key {
        opts = opts.with_base_key(key);
    }

    if let Commands::Encrypted { width, cipher, .. } = &cli.command {
        opts = apply_cipher(opts, *width, (*cipher).into());
    }

    debug!("initializing factory `{}` with machine_id {}", cli.name, cli.machine_id);
    nonce_core::init(opts)?;
    info!("factory `{}` initialized", cli.name);

    let nonce = match cli.command {
        Commands::Nonce { width } => nonce_core::nonce(&cli.name, width)?,
        Commands::Sortable { width } => nonce_core::sortable_nonce(&cli.name, width)?,
        Commands::Encrypted { width, base, .. } => {
            nonce_core::encrypted_nonce(&cli.name, width, base.into())?
        }
    };

    println!("{}", hex::encode(nonce));
    Ok(())
}

fn apply_cipher(opts: FactoryOpts, width: u16, choice: CipherChoice) -> FactoryOpts {
    let config = CipherConfig::new(choice);
    match width {
        64 => opts.with_cipher64(config),
        96 => opts.with_cipher96(config),
        128 => opts.with_cipher128(config),
        _ => opts,
    }
}
