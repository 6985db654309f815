use crate::commands::CmdResult;
use crate::error::Result;
use crate::remote::ContractService;

pub fn run<S: ContractService>(service: &S, declaration_id: &str) -> Result<CmdResult> {
    let declaration = service.get_declaration(declaration_id)?;
    Ok(CmdResult::default().with_source(declaration.csl))
}
