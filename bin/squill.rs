use anyhow::Result;
use clap::Parser;
use squill::SqlConfig;
use tracing::debug;

#[derive(Parser)]
#[command(name = "squill")]
#[command(about = "Translate Lucene queries into PostgreSQL WHERE clauses", long_about = None)]
struct Args {
    /// Lucene query expression
    query: String,

    /// Column bound to bare terms that carry no field prefix
    #[arg(long, env = "SQUILL_DEFAULT_FIELD", default_value = "")]
    default_field: String,

    /// Emit `?` placeholders and print the bound values as JSON
    #[arg(long)]
    parameterized: bool,

    /// Print the canonical Lucene form of the parsed query instead of SQL
    #[arg(long)]
    explain: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = SqlConfig::default().with_default_field(args.default_field);

    debug!(query = %args.query, "translating query");

    if args.explain {
        let expr = squill::parse(&args.query)?;
        println!("{}", expr);
        return Ok(());
    }

    if args.parameterized {
        let (sql, params) = squill::to_parameterized_postgres(&args.query, config)?;
        println!("{}", sql);
        println!("{}", serde_json::to_string(&params)?);
    } else {
        println!("{}", squill::to_postgres(&args.query, config)?);
    }

    Ok(())
}
