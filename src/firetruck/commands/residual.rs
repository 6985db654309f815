use crate::commands::CmdResult;
use crate::error::Result;
use crate::remote::ContractService;

pub fn run<S: ContractService>(service: &S, id: &str, simplify: bool) -> Result<CmdResult> {
    let residual = service.residual_source(id, simplify)?;
    Ok(CmdResult::default().with_source(residual.csl))
}
