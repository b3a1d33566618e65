use chumsky::prelude::*;
use minpress::{min_presses, solver, Matrix};
use owo_colors::OwoColorize;
use std::{env, fmt, fs, io, process};

fn main() {
    match env::args().nth(1) {
        Some(path) => run_file(&path),
        None => run_interactive(),
    }
}

/// Solves every machine in the input file and prints the summed minimum.
fn run_file(path: &str) {
    let input = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("failed to read {}: {}", path, e);
        process::exit(1);
    });

    let mut presses = 0;

    for (i, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let machine = match parser().parse(line.trim()) {
            Ok(machine) => machine,
            Err(e) => {
                eprintln!("line {}: {:?}", i + 1, e);
                process::exit(1);
            }
        };

        match solve_machine(&machine) {
            Ok(n) => presses += n,
            Err(e) => {
                eprintln!("line {}: {}", i + 1, e);
                process::exit(1);
            }
        }
    }

    println!("{}", presses);
}

/// Reads one machine per line from stdin and walks through the solve.
fn run_interactive() {
    ctrlc::set_handler(|| {
        println!("\nBye!");
        process::exit(0);
    })
    .expect("failed to set Ctrl-C handler");

    let mut buf = String::new();
    loop {
        println!("Feed me a machine:");
        let n = io::stdin().read_line(&mut buf).expect("failed to read line");
        if n == 0 {
            break;
        }

        match parser().parse(buf.trim_end()) {
            Ok(machine) => report(&machine),
            Err(e) => println!("Error: {:?}", e),
        }

        buf.clear();
    }
}

fn report(machine: &Machine) {
    println!("\nInput interpretation: {}", machine);

    let Some((columns, totals)) = machine.to_system() else {
        println!("Error: a switch references a counter that does not exist\n");
        return;
    };

    let mut matrix = Matrix::from_columns(&columns, &totals);
    println!("\n----- AUGMENTED MATRIX -----\n{}", matrix);

    matrix.reduce();
    println!("----- ROW ECHELON FORM -----\n{}", matrix);

    match solver::solve(&matrix) {
        Ok(n) => println!("Fewest presses: {}", n.green().bold()),
        Err(e) => println!("{}", e.yellow()),
    }
    println!();
}

fn solve_machine(machine: &Machine) -> Result<i64, String> {
    let (columns, totals) = machine
        .to_system()
        .ok_or_else(|| "a switch references a counter that does not exist".to_owned())?;

    min_presses(&columns, &totals).map_err(|e| e.to_string())
}

/// One machine: a target light pattern, the counters each switch feeds, and
/// the target counter levels.
///
/// The light pattern only matters for the switch-toggling variant of the
/// puzzle; it is parsed and displayed but plays no part in the press count.
#[derive(Debug)]
struct Machine {
    lights: Vec<bool>,
    switches: Vec<Vec<usize>>,
    targets: Vec<i64>,
}

impl Machine {
    /// Turns the switch wiring into one 0/1 coefficient column per switch,
    /// paired with the target totals. `None` if a switch feeds a counter
    /// index out of range.
    fn to_system(&self) -> Option<(Vec<Vec<i64>>, Vec<i64>)> {
        let height = self.targets.len();
        let mut columns = vec![vec![0; height]; self.switches.len()];

        for (column, switch) in columns.iter_mut().zip(&self.switches) {
            for &counter in switch {
                if counter >= height {
                    return None;
                }
                column[counter] = 1;
            }
        }

        Some((columns, self.targets.clone()))
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for &on in &self.lights {
            f.write_str(if on { "#" } else { "." })?;
        }
        f.write_str("]")?;

        for switch in &self.switches {
            write!(f, " (")?;
            for (i, counter) in switch.iter().enumerate() {
                if i != 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", counter)?;
            }
            f.write_str(")")?;
        }

        f.write_str(" {")?;
        for (i, target) in self.targets.iter().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", target)?;
        }
        f.write_str("}")
    }
}

/// Parses one machine line, e.g.
/// `[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}`.
fn parser() -> impl Parser<char, Machine, Error = Simple<char>> {
    let lights = one_of(".#")
        .repeated()
        .at_least(1)
        .delimited_by(just('['), just(']'))
        .map(|cells: Vec<char>| cells.into_iter().map(|c| c == '#').collect::<Vec<_>>());

    let counter = text::int(10).try_map(|s: String, span| {
        s.parse::<usize>().map_err(|e| Simple::custom(span, e))
    });

    let target = text::int(10).try_map(|s: String, span| {
        s.parse::<i64>().map_err(|e| Simple::custom(span, e))
    });

    let switch = counter
        .separated_by(just(','))
        .at_least(1)
        .delimited_by(just('('), just(')'));

    let targets = target
        .separated_by(just(','))
        .at_least(1)
        .delimited_by(just('{'), just('}'));

    lights
        .then(switch.padded().repeated().at_least(1))
        .then(targets)
        .then_ignore(end())
        .map(|((lights, switches), targets)| Machine {
            lights,
            switches,
            targets,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_machine_line() {
        let machine = parser()
            .parse("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}")
            .unwrap();

        assert_eq!(machine.lights, vec![false, true, true, false]);
        assert_eq!(machine.switches.len(), 6);
        assert_eq!(machine.switches[1], vec![1, 3]);
        assert_eq!(machine.targets, vec![3, 5, 4, 7]);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parser().parse("[..] (0,1) {1,2} trailing").is_err());
        assert!(parser().parse("(0,1) {1,2}").is_err());
    }

    #[test]
    fn display_round_trips() {
        let line = "[.##.] (3) (1,3) (2) {3,5,4,7}";
        let machine = parser().parse(line).unwrap();
        assert_eq!(machine.to_string(), line);
    }

    #[test]
    fn example_machine_needs_ten_presses() {
        let machine = parser()
            .parse("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}")
            .unwrap();

        assert_eq!(solve_machine(&machine), Ok(10));
    }

    #[test]
    fn out_of_range_counter_is_rejected() {
        let machine = parser().parse("[#] (5) {3}").unwrap();
        assert!(machine.to_system().is_none());
    }
}
