use clap::Parser;
use phq9_screen::{read_bulk, Error, Scorecard};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;

#[derive(Parser)]
struct Args {
    path: String,
    /// Emit one JSON object per record instead of plain lines.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    id: &'a str,
    #[serde(flatten)]
    card: &'a Scorecard,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    let reader = BufReader::new(File::open(&args.path)?);
    for row in read_bulk(reader) {
        match row {
            Ok((id, assessment)) => {
                let card = assessment.score();
                if args.json {
                    println!(
                        "{}",
                        serde_json::to_string(&JsonRow {
                            id: &id,
                            card: &card
                        })?
                    );
                } else {
                    println!(
                        "id = {}, total = {}, severity = {}, major = {}, other = {}",
                        id,
                        card.total_score,
                        card.severity,
                        card.potential_major_depression,
                        card.potential_other_depression
                    );
                }
            }
            Err(e) => {
                eprintln!("skipping record: {}", e);
            }
        }
    }
    Ok(())
}
