use chrono::{Local, NaiveDate};
use class_schedule::calendar::weekday_name;
use class_schedule::{
    AppConfig, AttendanceRecord, ClassDateSet, ExtractedSchedule, ExtractionRequest,
    JsonFileExtractor, NonInstructionalEntry, ScheduleSession, logging, save_class_dates_to_csv,
    save_class_dates_to_json,
};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cell = |ci: usize, row_idx: usize| -> String {
        match columns[ci].get(row_idx) {
            Ok(AnyValue::Null) | Err(_) => String::new(),
            Ok(AnyValue::String(s)) => s.to_string(),
            Ok(av) => av.to_string(),
        }
    };

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, width) in widths.iter_mut().enumerate() {
        for row_idx in 0..df.height() {
            *width = (*width).max(cell(ci, row_idx).len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push_str(&format!(" {:<width$} |", name, width = widths[i]));
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, width) in widths.iter().enumerate() {
            out.push_str(&format!(" {:<width$} |", cell(ci, row_idx), width = *width));
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show session state\n  today <YYYY-MM-DD>                 Override today's date\n  course <code>                      Set course code\n  extract <catalog_json> <timetable> <calendar>\n                                     Run extraction for the current course\n  weekdays <csv>                     Set class weekdays (e.g. Tuesday,Thursday)\n  holiday <text...>                  Add a non-instructional day or range\n  entries                            List non-instructional entries\n  start <YYYY-MM-DD|none>            Set window start date\n  end <YYYY-MM-DD|none>              Set window end date\n  window <start> <end>               Set both window dates\n  extra <text...>                    Set extra instructional days (comma separated)\n  extra clear                        Clear extra instructional days\n  dates                              Show computed class dates\n  excluded                           Show non-instructional dates\n  attendance <total> <attended> [classes_left]\n                                     Check exam eligibility\n  export <csv|json> <path>           Save class dates to disk\n  config <json_path>                 Load configuration\n  quit|exit                          Exit"
    );
}

fn parse_date_arg(s: &str) -> Result<Option<NaiveDate>, ()> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ())
}

fn print_session(session: &ScheduleSession) {
    let weekdays = session
        .class_weekdays()
        .sorted()
        .iter()
        .map(|wd| weekday_name(*wd))
        .collect::<Vec<_>>()
        .join(", ");
    let fmt_date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    let window = session.window();
    println!("Course code        : {}", session.course_code());
    println!("Class weekdays     : {}", weekdays);
    println!("Window start       : {}", fmt_date(window.start));
    println!("Window end         : {}", fmt_date(window.end));
    println!("Last instr. day    : {}", fmt_date(session.semester_end()));
    println!("Extra days         : {}", session.extra_days());
    if let Some(explanation) = session
        .extraction()
        .and_then(|extraction| extraction.explanation.as_deref())
    {
        println!("Summary            : {}", explanation);
    }
}

fn print_dates(title: &str, dates: &ClassDateSet) {
    println!("{} ({}):", title, dates.len());
    match dates.to_dataframe() {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering dates: {}", e),
    }
}

fn with_extraction(
    session: &mut ScheduleSession,
    today: NaiveDate,
    edit: impl FnOnce(&mut ExtractedSchedule),
) {
    let mut extracted = session.extraction().cloned().unwrap_or_default();
    edit(&mut extracted);
    session.apply_extraction(extracted, today);
}

fn main() {
    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}; using defaults", e);
            AppConfig::default()
        }
    };
    logging::init(config.verbosity);

    let mut session = ScheduleSession::new(config.course_code.clone());
    let mut today = Local::now().date_naive();

    println!("Class Schedule (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_session(&session),
            "today" => match parts.next().map(parse_date_arg) {
                Some(Ok(Some(date))) => {
                    today = date;
                    println!("Today set to {}.", today);
                }
                _ => println!("Usage: today <YYYY-MM-DD>"),
            },
            "course" => match parts.next() {
                Some(code) => {
                    session.set_course_code(code);
                    println!("Course code set to {}.", code);
                }
                None => println!("Usage: course <code>"),
            },
            "extract" => {
                let catalog = parts.next();
                let timetable = parts.next();
                let calendar = parts.next();
                match (catalog, timetable, calendar) {
                    (Some(catalog), Some(timetable), Some(calendar)) => {
                        let extractor = JsonFileExtractor::new(catalog);
                        let request =
                            ExtractionRequest::new(timetable, calendar, session.course_code());
                        match session.run_extraction(&extractor, &request, today) {
                            Ok(_) => {
                                println!(
                                    "Schedule processed for {}. Now select a date range.",
                                    session.course_code()
                                );
                                print_session(&session);
                            }
                            Err(e) => println!("Processing failed: {}", e),
                        }
                    }
                    _ => println!("Usage: extract <catalog_json> <timetable> <calendar>"),
                }
            }
            "weekdays" => match parts.next() {
                Some(csv) => {
                    let names: Vec<String> = csv
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                    with_extraction(&mut session, today, |extracted| {
                        extracted.class_days = names;
                    });
                    println!("Class weekdays updated.");
                    print_session(&session);
                }
                None => println!("Usage: weekdays <csv>"),
            },
            "holiday" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: holiday <text...>");
                    continue;
                }
                let text = rest.join(" ");
                with_extraction(&mut session, today, |extracted| {
                    extracted
                        .non_instructional_days
                        .push(NonInstructionalEntry::new(text.clone(), "Holiday"));
                });
                println!("Added non-instructional day '{}'.", text);
            }
            "entries" => {
                let entries = session.non_instructional_days();
                if entries.is_empty() {
                    println!("No non-instructional days.");
                }
                for entry in entries {
                    println!("  {:<28} {}", entry.text, entry.reason);
                }
            }
            "start" | "end" => match parts.next().map(parse_date_arg) {
                Some(Ok(date)) => {
                    let res = if cmd == "start" {
                        session.set_start_date(date)
                    } else {
                        session.set_end_date(date)
                    };
                    match res {
                        Ok(_) => println!("{} date set.", cmd),
                        Err(e) => println!("Invalid date: {}", e),
                    }
                }
                Some(Err(_)) => println!("Invalid date (YYYY-MM-DD)"),
                None => println!("Usage: {} <YYYY-MM-DD|none>", cmd),
            },
            "window" => {
                let start_s = parts.next();
                let end_s = parts.next();
                match (start_s.map(parse_date_arg), end_s.map(parse_date_arg)) {
                    (Some(Ok(start)), Some(Ok(end))) => {
                        match session
                            .set_start_date(start)
                            .and_then(|_| session.set_end_date(end))
                        {
                            Ok(_) => println!("Window set."),
                            Err(e) => println!("Invalid date: {}", e),
                        }
                    }
                    (Some(_), Some(_)) => println!("Invalid date (YYYY-MM-DD)"),
                    _ => println!("Usage: window <YYYY-MM-DD> <YYYY-MM-DD>"),
                }
            }
            "extra" => {
                let rest: Vec<&str> = parts.collect();
                match rest.as_slice() {
                    [] => println!("Usage: extra <text...>|clear"),
                    ["clear"] => {
                        session.set_extra_days("");
                        println!("Extra instructional days cleared.");
                    }
                    _ => {
                        session.set_extra_days(rest.join(" "));
                        println!(
                            "Extra instructional days set ({} lines).",
                            session.extra_lines().len()
                        );
                    }
                }
            }
            "dates" => {
                let dates = session.class_dates(today);
                print_dates("Class dates", &dates);
            }
            "excluded" => {
                let excluded: ClassDateSet = session.excluded_dates(today).into_iter().collect();
                print_dates("Non-instructional dates", &excluded);
            }
            "attendance" => {
                let total = parts.next().map(str::parse::<i64>);
                let attended = parts.next().map(str::parse::<i64>);
                let left = parts.next().map(str::parse::<i64>);
                let (total, attended) = match (total, attended) {
                    (Some(Ok(total)), Some(Ok(attended))) => (total, attended),
                    (Some(_), Some(_)) => {
                        println!("Please enter valid numbers for total and attended classes.");
                        continue;
                    }
                    _ => {
                        println!("Usage: attendance <total> <attended> [classes_left]");
                        continue;
                    }
                };
                let record = match AttendanceRecord::new(total, attended) {
                    Ok(record) => record,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                let threshold = config.eligibility_threshold;
                let current = record.summary(threshold);
                println!(
                    "Current attendance : {:.2}% ({})",
                    current.percentage,
                    if current.eligible {
                        "eligible"
                    } else {
                        "not eligible"
                    }
                );

                let classes_left = match left {
                    Some(Ok(left)) => left,
                    Some(Err(_)) => {
                        println!("Invalid classes_left");
                        continue;
                    }
                    None => session.classes_remaining(today) as i64,
                };
                match record.scenario(classes_left) {
                    Ok(scenario) => {
                        let projected = scenario.projected(threshold);
                        println!(
                            "If you attend all {} remaining: {:.2}% ({})",
                            scenario.classes_left(),
                            projected.percentage,
                            if projected.eligible {
                                "eligible"
                            } else {
                                "not eligible"
                            }
                        );
                    }
                    Err(e) => println!("{}", e),
                }
            }
            "export" => {
                let fmt = parts.next();
                let path = parts.next();
                let dates = session.class_dates(today);
                let res = match (fmt, path) {
                    (Some("csv"), Some(path)) => save_class_dates_to_csv(&dates, path),
                    (Some("json"), Some(path)) => {
                        save_class_dates_to_json(&dates, &session.excluded_dates(today), path)
                    }
                    _ => {
                        println!("Usage: export <csv|json> <path>");
                        continue;
                    }
                };
                match res {
                    Ok(_) => println!("Class dates saved to {}.", path.unwrap_or_default()),
                    Err(e) => println!("Error saving class dates: {}", e),
                }
            }
            "config" => match parts.next() {
                Some(path) => match AppConfig::load(path) {
                    Ok(loaded) => {
                        config = loaded;
                        if !config.course_code.is_empty() {
                            session.set_course_code(config.course_code.clone());
                        }
                        println!("Config loaded from {}.", path);
                    }
                    Err(e) => println!("Error loading config: {}", e),
                },
                None => println!("Usage: config <json_path>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
