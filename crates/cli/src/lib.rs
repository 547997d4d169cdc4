//! # cli
//!
//! Command-line driver that synthesizes the demonstration circuits, proves
//! them with the transcript backend and reports the outcome.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, ensure, Context, Result};
use board::{Board, BoardConfig, Gadget, Params, ProvingBackend, TranscriptBackend};
use circuits::sha256::{native, IV};
use circuits::{bits_from_u32s, u32s_from_bits, BlockVariable, CubicIdentityGadget, DigestVariable, Sha256CompressionGadget};
use clap::{Parser, Subcommand};
use pasta_curves::Fp;
use tracing::info;

const DEFAULT_LEFT: &str = "426bc2d84dc8678281e8957a409ec148e6cffbe8afe6ba4f9c6f1978dd7af7e9";
const DEFAULT_RIGHT: &str = "038cce42abd366b83ede7e009130de5372cdf73dee8251148cb48d1b9af68ad0";

/// R1CS demonstration driver
#[derive(Parser)]
#[command(name = "snark-demo")]
#[command(about = "Build, prove and verify R1CS demonstration circuits")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// JSON board configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// x^3 + x + 5 with x as the public input
    Simple {
        #[arg(short, long, default_value_t = 3)]
        x: u64,
    },
    /// SHA-256 of a single padded block (message up to 55 bytes)
    Block {
        #[arg(short, long, default_value = "hello world")]
        message: String,
    },
    /// SHA-256 compression of two 32-byte digests
    TwoToOne {
        /// Left digest (64 hex chars)
        #[arg(short, long, default_value = DEFAULT_LEFT)]
        left: String,

        /// Right digest (64 hex chars)
        #[arg(short, long, default_value = DEFAULT_RIGHT)]
        right: String,
    },
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => BoardConfig::from_json_file(path)?,
        None => BoardConfig::default(),
    };
    let params = Params::<Fp>::new(config);

    match cli.command {
        Commands::Simple { x } => execute_simple(&params, x),
        Commands::Block { message } => execute_block(&params, &message),
        Commands::TwoToOne { left, right } => execute_two_to_one(&params, &left, &right),
    }
}

fn execute_simple(params: &Arc<Params<Fp>>, x: u64) -> Result<()> {
    let mut b = Board::new(params.clone());
    let mut gadget = CubicIdentityGadget::new(&mut b);
    b.set_primary_input_count(1)?;
    gadget.generate_constraints(&mut b)?;
    b.assign(gadget.x, Fp::from(x))?;
    gadget.generate_witness(&mut b)?;

    println!("x = {x}, out = {:?}", b.value(gadget.out)?);
    report(&b)
}

fn execute_block(params: &Arc<Params<Fp>>, message: &str) -> Result<()> {
    let words = native::pad_single_block(message.as_bytes())
        .with_context(|| format!("message of {} bytes does not fit one block", message.len()))?;

    let mut b = Board::new(params.clone());
    let out = DigestVariable::digest(&mut b, "out");
    let mut block = BlockVariable::block(&mut b, "block");
    b.set_primary_input_count(out.len())?;
    let mut sha = Sha256CompressionGadget::from_block(&mut b, &block, &out, "sha256")?;
    sha.generate_constraints(&mut b)?;
    block.generate_witness(&mut b, &bits_from_u32s(&words))?;
    sha.generate_witness(&mut b)?;

    let digest = u32s_from_bits(&out.get_bits(&b)?);
    println!("Digest: {}", hex::encode(native::words_to_bytes(&digest)));
    ensure!(digest == native::compress(IV, words), "circuit digest differs from native SHA-256");
    report(&b)
}

fn execute_two_to_one(params: &Arc<Params<Fp>>, left: &str, right: &str) -> Result<()> {
    let left_words = parse_digest(left).context("left digest")?;
    let right_words = parse_digest(right).context("right digest")?;

    let mut b = Board::new(params.clone());
    let out = DigestVariable::digest(&mut b, "out");
    let mut l = DigestVariable::digest(&mut b, "left");
    let mut r = DigestVariable::digest(&mut b, "right");
    b.set_primary_input_count(out.len())?;
    let mut sha = Sha256CompressionGadget::new(&mut b, &l, &r, &out, "sha256")?;
    sha.generate_constraints(&mut b)?;
    l.generate_witness(&mut b, &bits_from_u32s(&left_words))?;
    r.generate_witness(&mut b, &bits_from_u32s(&right_words))?;
    sha.generate_witness(&mut b)?;

    let digest = u32s_from_bits(&out.get_bits(&b)?);
    println!("Digest: {}", hex::encode(native::words_to_bytes(&digest)));
    ensure!(
        digest == native::two_to_one(left_words, right_words),
        "circuit digest differs from native SHA-256"
    );
    report(&b)
}

/// Keygen, prove and verify the board's circuit, printing the outcome.
fn report(b: &Board<Fp>) -> Result<()> {
    let cs = b.export_system();
    println!("Number of R1CS constraints: {}", cs.num_constraints());

    let backend = TranscriptBackend::new(b.params().domain());
    let keys = backend.generate_keys(&cs)?;
    let witness = b.export_assignment()?;
    let proof = backend.prove(&keys.pk, &witness.primary, &witness.auxiliary)?;
    let verified = backend.verify(&keys.vk, &witness.primary, &proof)?;
    info!(verified, proof_bytes = proof.to_bytes()?.len(), "proof checked");
    println!("Verification status: {verified}");
    Ok(())
}

fn parse_digest(s: &str) -> Result<[u32; 8]> {
    let bytes = hex::decode(s.trim_start_matches("0x"))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow!("expected 32 bytes, got {}", b.len()))?;
    Ok(core::array::from_fn(|i| u32::from_be_bytes([bytes[4 * i], bytes[4 * i + 1], bytes[4 * i + 2], bytes[4 * i + 3]])))
}
