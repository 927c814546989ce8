use crate::cli::DepsArgs;
use crate::error::Result;
use qcvars::core::registry::Registry;
use qcvars::engine::analysis;
use std::io::{self, Write};

pub fn run(args: DepsArgs) -> Result<()> {
    let registry = super::load_registry(&args.families)?;
    let stdout = io::stdout();
    write_dependencies(&mut stdout.lock(), &registry, &args.name)
}

fn write_dependencies<W: Write>(writer: &mut W, registry: &Registry, name: &str) -> Result<()> {
    let Some(rule) = registry.get(name) else {
        writeln!(
            writer,
            "'{}' is not a derived quantity; it must be supplied as a base value.",
            name
        )?;
        return Ok(());
    };

    let direct = analysis::direct_dependencies(registry, name)?;
    let transitive = analysis::transitive_dependencies(registry, name)?;
    let required = analysis::required_base_quantities(registry, name)?;

    writeln!(writer, "{} = {}", name, rule)?;
    write_section(writer, "Direct arguments", &direct)?;
    write_section(writer, "Transitive dependencies", &transitive)?;
    write_section(writer, "Required base values", &required)?;
    Ok(())
}

fn write_section<W: Write>(writer: &mut W, title: &str, names: &[&str]) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{} ({}):", title, names.len())?;
    for name in names {
        writeln!(writer, "  {}", name)?;
    }
    Ok(())
}
