use std::fmt::Display;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "> ";

/// Reads one expression per line from `input` and writes what `eval` makes of it.
///
/// Results and prompts go to `output`, failed evaluations to `errors`. Blank lines are
/// skipped; only end of input or an I/O error stops the loop.
pub(super) fn run<R, W, V, F, E>(
    input: R,
    output: &mut W,
    errors: &mut V,
    mut eval: F,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    V: Write,
    F: FnMut(&str) -> Result<String, E>,
    E: Display,
{
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let expression = line.trim();
        if !expression.is_empty() {
            match eval(expression) {
                Ok(rendered) => writeln!(output, "{}", rendered)?,
                Err(e) => {
                    writeln!(errors, "Error: {}", e)?;
                    errors.flush()?;
                }
            }
        }
        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_each_line_and_survives_errors() {
        let input = "1\n\n  boom \n2\n";
        let mut output = Vec::new();
        let mut errors: Vec<u8> = Vec::new();
        let mut seen = Vec::new();

        run(input.as_bytes(), &mut output, &mut errors, |expr| {
            seen.push(expr.to_string());
            if expr == "boom" {
                Err("type error")
            } else {
                Ok(format!("={}", expr))
            }
        })
        .unwrap();

        assert_eq!(seen, vec!["1", "boom", "2"]);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "> =1\n> > > =2\n> \n"
        );
        assert_eq!(String::from_utf8(errors).unwrap(), "Error: type error\n");
    }

    #[test]
    fn empty_input_just_prompts() {
        let mut output = Vec::new();
        let mut errors: Vec<u8> = Vec::new();
        run(&b""[..], &mut output, &mut errors, |_| Ok::<_, String>(String::new())).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "> \n");
        assert!(errors.is_empty());
    }
}
