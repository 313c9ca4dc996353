use std::io::stdin;

use phq9_screen::{render_report, AnswerStore, Error, QUESTIONNAIRE};

fn main() {
    let mut buffer = String::new();
    let mut store = AnswerStore::default();

    println!("\n{}", QUESTIONNAIRE.title);
    println!("\n{}", QUESTIONNAIRE.instruction);
    println!("\nScoring options:");
    for option in &QUESTIONNAIRE.frequency_options {
        println!("{}: {}", option.score, option.text);
    }

    for question in &QUESTIONNAIRE.questions {
        println!("\n{}. {}", question.id, question.text);
        loop {
            println!("Enter your score (0-3):");
            stdin().read_line(&mut buffer).unwrap();
            if store_answer(buffer.trim(), &mut store).is_err() {
                println!("Please enter a valid score (0-3)");
                buffer.clear();
            } else {
                buffer.clear();
                break;
            }
        }
    }

    println!("\n{}", QUESTIONNAIRE.difficulty_prompt);
    for (level, text) in QUESTIONNAIRE.difficulty_levels.iter().enumerate() {
        println!("{}: {}", level, text);
    }
    loop {
        println!("\nEnter difficulty level (0-3):");
        stdin().read_line(&mut buffer).unwrap();
        if store_difficulty(buffer.trim(), &mut store).is_err() {
            println!("Please enter a valid difficulty level (0-3)");
            buffer.clear();
        } else {
            buffer.clear();
            break;
        }
    }

    let assessment = store.finish().unwrap();
    let card = assessment.score();
    println!("{}", render_report(&assessment, &card));
}

fn store_answer(value: &str, store: &mut AnswerStore) -> Result<(), Error> {
    let value = value.parse::<u8>().map_err(|_| Error::InvalidAnswer)?;
    store.push(value)?;
    Ok(())
}

fn store_difficulty(value: &str, store: &mut AnswerStore) -> Result<(), Error> {
    let value = value.parse::<u8>().map_err(|_| Error::InvalidAnswer)?;
    store.set_difficulty(value)?;
    Ok(())
}
