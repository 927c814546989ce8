use crate::cli::ListArgs;
use crate::error::Result;
use qcvars::core::registry::Registry;
use std::io::{self, Write};

pub fn run(args: ListArgs) -> Result<()> {
    let registry = super::load_registry(&args.families)?;
    let stdout = io::stdout();
    write_listing(&mut stdout.lock(), &registry, args.rules)?;
    Ok(())
}

fn write_listing<W: Write>(writer: &mut W, registry: &Registry, show_rules: bool) -> io::Result<()> {
    if !show_rules {
        for name in registry.names() {
            writeln!(writer, "{}", name)?;
        }
        return Ok(());
    }

    let width = registry.names().map(str::len).max().unwrap_or(0);
    for (name, rule) in registry.iter() {
        writeln!(writer, "{:<width$}  = {}", name, rule)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcvars::core::families::sapt::sapt_psivars;
    use qcvars::core::rules::Rule;

    #[test]
    fn names_are_listed_in_declaration_order() {
        let mut buffer = Vec::new();
        write_listing(&mut buffer, &sapt_psivars(), false).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 89);
        assert_eq!(lines[0], "SAPT EXCHSCAL");
        assert!(lines.contains(&"SAPT0 TOTAL ENERGY"));
    }

    #[test]
    fn rules_are_rendered_next_to_names() {
        let registry = Registry::from_rules(
            "demo",
            [
                ("C", Rule::sum(["A", "B"])),
                ("LONGER NAME", Rule::sum(["C"])),
            ],
        );
        let mut buffer = Vec::new();
        write_listing(&mut buffer, &registry, true).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(
            text,
            "C            = sum('A', 'B')\nLONGER NAME  = sum('C')\n"
        );
    }
}
