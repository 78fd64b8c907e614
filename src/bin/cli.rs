use std::io::{self, BufRead, Write};

use agenda_tool::{
    AgendaSettings, ArtifactFormat, DayContent, FileSink, Generation, ScheduleConfig, clock,
    load_config_from_json, settings,
};
use chrono::NaiveDate;

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the current draft\n  title <text...>                    Set the agenda title\n  dates <YYYY-MM-DD> <YYYY-MM-DD>    Set first and last day\n  days <n>                           Keep the start date, span n days\n  slot add <HH:MM> <HH:MM>           Append a session slot\n  slot remove                        Remove the last slot and its content\n  break add <HH:MM> <HH:MM> <name...>\n                                     Add a break to every day\n  break remove <n>                   Remove the n-th break (see break list)\n  break list                         List breaks\n  content <day> <slot> <title> [| bullet; bullet [| trainer]]\n                                     Set content for a day/slot (1-based)\n  load json <path>                   Replace the draft from a JSON file\n  preview                            Print the paginated table\n  export <format> [path]             Write html|table|doc|csv\n  quit|exit                          Exit"
    );
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// `<title> [| bullet; bullet [| trainer]]`
fn parse_content(rest: &str) -> Option<DayContent> {
    let mut fields = rest.split('|').map(str::trim);
    let title = fields.next().filter(|t| !t.is_empty())?;
    let mut content = DayContent::new(title);
    if let Some(bullets) = fields.next() {
        content = content.with_bullets(
            bullets
                .split(';')
                .map(str::trim)
                .filter(|b| !b.is_empty()),
        );
    }
    if let Some(trainer) = fields.next().filter(|t| !t.is_empty()) {
        content = content.with_trainer(trainer);
    }
    Some(content)
}

fn rest_of_line(input: &str, skip_words: usize) -> &str {
    let mut rest = input;
    for _ in 0..skip_words {
        rest = rest.trim_start();
        rest = rest.find(char::is_whitespace).map_or("", |i| &rest[i..]);
    }
    rest.trim()
}

fn handle_slot(draft: &mut ScheduleConfig, args: &[&str]) {
    match args {
        ["add", start, end] => {
            let parsed = clock::parse_clock(start).and_then(|s| Ok((s, clock::parse_clock(end)?)));
            match parsed.and_then(|(s, e)| draft.add_slot(s, e)) {
                Ok(index) => println!("Added slot #{}", index + 1),
                Err(e) => println!("Error: {}", e),
            }
        }
        ["remove"] => match draft.remove_last_slot() {
            Some(slot) => println!(
                "Removed slot #{} ({})",
                slot.index + 1,
                clock::time_range_label(slot.start, slot.end)
            ),
            None => println!("No slots to remove"),
        },
        _ => println!("Usage: slot add <HH:MM> <HH:MM> | slot remove"),
    }
}

fn handle_break(draft: &mut ScheduleConfig, input: &str, args: &[&str]) {
    match args {
        ["add", start, end, _, ..] => {
            let name = rest_of_line(input, 4);
            let parsed = clock::parse_clock(start).and_then(|s| Ok((s, clock::parse_clock(end)?)));
            match parsed.and_then(|(s, e)| draft.add_break(name, s, e)) {
                Ok(_) => println!("Added break '{}'", name),
                Err(e) => println!("Error: {}", e),
            }
        }
        ["remove", n] => {
            let id = n
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|pos| draft.breaks.get(pos))
                .map(|b| b.id);
            match id.and_then(|id| draft.remove_break(id)) {
                Some(entry) => println!("Removed break '{}'", entry.name),
                None => println!("No break #{}", n),
            }
        }
        ["list"] => {
            if draft.breaks.is_empty() {
                println!("No breaks");
            }
            for (pos, entry) in draft.breaks.iter().enumerate() {
                println!(
                    "  {}. {} {}",
                    pos + 1,
                    entry.name,
                    clock::time_range_label(entry.start, entry.end)
                );
            }
        }
        _ => println!("Usage: break add <HH:MM> <HH:MM> <name...> | break remove <n> | break list"),
    }
}

fn export(draft: &ScheduleConfig, settings: &AgendaSettings, args: &[&str]) {
    let (format, path) = match args {
        [format] => (*format, None),
        [format, path] => (*format, Some(*path)),
        _ => {
            println!("Usage: export <html|table|doc|csv> [path]");
            return;
        }
    };
    let format: ArtifactFormat = match format.parse() {
        Ok(f) => f,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    let sink = match path {
        Some(path) => FileSink::new(path),
        None => FileSink::for_format(&settings.output_dir, &settings.file_stem, format),
    };
    let generation = match Generation::compose(draft) {
        Ok(g) => g,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    let renderer = match format.renderer(settings) {
        Ok(r) => r,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    match generation.deliver(renderer.as_ref(), &sink) {
        Ok(delivery) => println!("Exported {} ({} bytes)", delivery.location, delivery.bytes),
        Err(e) => println!("Export failed: {}", e),
    }
}

fn preview(draft: &ScheduleConfig, settings: &AgendaSettings) {
    let artifact = Generation::compose(draft)
        .map_err(|e| e.to_string())
        .and_then(|g| {
            g.render_format(ArtifactFormat::Table, settings)
                .map_err(|e| e.to_string())
        });
    match artifact {
        Ok(artifact) => println!("{}", artifact.encode()),
        Err(e) => println!("Error: {}", e),
    }
}

fn main() {
    settings::init_tracing("warn");

    let settings = match AgendaSettings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Settings error: {}", e);
            AgendaSettings::default()
        }
    };
    let today = chrono::Local::now().date_naive();
    let mut draft = ScheduleConfig::new("Untitled agenda", today, today);

    println!("Agenda Tool (CLI) - type 'help' for commands\n");
    println!("{}", draft.describe());

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let words: Vec<&str> = input.split_whitespace().collect();
        let (cmd, args) = match words.split_first() {
            Some((cmd, args)) => (*cmd, args),
            None => continue,
        };

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", draft.describe()),
            "title" => {
                let title = rest_of_line(input, 1);
                if title.is_empty() {
                    println!("Usage: title <text...>");
                } else {
                    draft.set_title(title);
                    println!("Title set.");
                }
            }
            "dates" => match args {
                [start, end] => match (parse_date(start), parse_date(end)) {
                    (Some(s), Some(e)) => match draft.set_dates(s, e) {
                        Ok(()) => println!("{}", draft.describe()),
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Invalid date; expected YYYY-MM-DD"),
                },
                _ => println!("Usage: dates <YYYY-MM-DD> <YYYY-MM-DD>"),
            },
            "days" => match args.first().and_then(|n| n.parse::<i64>().ok()) {
                Some(n) => match draft.set_day_count(n) {
                    Ok(()) => println!("{}", draft.describe()),
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: days <n>"),
            },
            "slot" => handle_slot(&mut draft, args),
            "break" => handle_break(&mut draft, input, args),
            "content" => {
                let day = args.first().and_then(|d| d.parse::<usize>().ok());
                let slot = args.get(1).and_then(|s| s.parse::<usize>().ok());
                match (day, slot, parse_content(rest_of_line(input, 3))) {
                    (Some(day), Some(slot), Some(content)) if day >= 1 && slot >= 1 => {
                        match draft.set_day_content(day - 1, slot - 1, content) {
                            Ok(()) => println!("Content set for day {} slot {}", day, slot),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!(
                        "Usage: content <day> <slot> <title> [| bullet; bullet [| trainer]]"
                    ),
                }
            }
            "load" => match args {
                ["json", path] => match load_config_from_json(path) {
                    Ok(config) => {
                        draft = config;
                        println!("Loaded.\n{}", draft.describe());
                    }
                    Err(e) => println!("Load error: {}", e),
                },
                _ => println!("Usage: load json <path>"),
            },
            "preview" => preview(&draft, &settings),
            "export" => export(&draft, &settings, args),
            _ => println!("Unknown command. Type 'help' for commands."),
        }
    }
}
