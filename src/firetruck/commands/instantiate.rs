use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::InstantiationRequest;
use crate::remote::ContractService;

/// Creates a contract from a declaration; the new id is the only id in the result.
pub fn run<S: ContractService>(service: &S, request: &InstantiationRequest) -> Result<CmdResult> {
    let response = service.instantiate(request)?;
    tracing::info!(
        declaration = %request.declaration_id,
        contract = %response.contract_id,
        "instantiated contract"
    );
    let mut result = CmdResult::default().with_contract_ids(vec![response.contract_id.clone()]);
    result.add_message(CmdMessage::success(format!(
        "Instantiated {} as {}",
        request.name, response.contract_id
    )));
    Ok(result)
}
