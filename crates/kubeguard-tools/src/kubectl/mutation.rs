//! Advisory side-effect labels; never used to gate execution

use super::policy::Subcommand;
use kubeguard_core::tools::ModifiesResource;

/// Label a command by its verb
pub fn classify_mutation(command: &str) -> ModifiesResource {
    let mut tokens = command.split_whitespace();
    let (Some(first), Some(verb)) = (tokens.next(), tokens.next()) else {
        return ModifiesResource::Unknown;
    };
    if super::base_name(first) != "kubectl" {
        return ModifiesResource::Unknown;
    }

    match verb.parse::<Subcommand>() {
        Ok(
            Subcommand::Get
            | Subcommand::Describe
            | Subcommand::Logs
            | Subcommand::Top
            | Subcommand::Version
            | Subcommand::ClusterInfo
            | Subcommand::Config,
        ) => ModifiesResource::No,
        Ok(
            Subcommand::Create
            | Subcommand::Apply
            | Subcommand::Delete
            | Subcommand::Patch
            | Subcommand::Replace
            | Subcommand::Scale
            | Subcommand::Rollout
            | Subcommand::Annotate
            | Subcommand::Label,
        ) => ModifiesResource::Yes,
        // side effects happen outside the cluster's object store
        Ok(Subcommand::Exec | Subcommand::PortForward | Subcommand::Proxy) => ModifiesResource::No,
        _ => ModifiesResource::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_verbs() {
        assert_eq!(classify_mutation("kubectl get pods"), ModifiesResource::No);
        assert_eq!(classify_mutation("kubectl config view"), ModifiesResource::No);
        assert_eq!(classify_mutation("kubectl cluster-info"), ModifiesResource::No);
    }

    #[test]
    fn test_mutating_verbs() {
        assert_eq!(classify_mutation("kubectl delete pod x"), ModifiesResource::Yes);
        assert_eq!(
            classify_mutation("kubectl rollout restart deploy/web"),
            ModifiesResource::Yes
        );
    }

    #[test]
    fn test_channel_verbs() {
        assert_eq!(classify_mutation("kubectl exec web -- ls"), ModifiesResource::No);
        assert_eq!(classify_mutation("kubectl proxy --port=8001"), ModifiesResource::No);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify_mutation("kubectl frobnicate"), ModifiesResource::Unknown);
        assert_eq!(classify_mutation("kubectl drain node-1"), ModifiesResource::Unknown);
        assert_eq!(classify_mutation("kubectl"), ModifiesResource::Unknown);
        assert_eq!(classify_mutation(""), ModifiesResource::Unknown);
        assert_eq!(classify_mutation("helm delete web"), ModifiesResource::Unknown);
    }
}
