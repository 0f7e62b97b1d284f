//! Delete pass for the VPC's subnets.

use super::SubnetService;
use crate::error::{ProviderOperation, ReconcileError};
use crate::models::SubnetFilter;
use crate::provider::NetworkClient;
use crate::scope::StateScope;

impl<C: NetworkClient> SubnetService<C> {
    /// Delete every subnet under the owning VPC.
    ///
    /// An unset VPC ID or a VPC the provider no longer knows both mean there
    /// is nothing left to delete. Each subnet is deleted under the VPC ID it
    /// reports itself. The first failed deletion stops the pass. The scope is
    /// only read.
    pub fn delete_subnets<S>(&self, scope: &S) -> Result<(), ReconcileError>
    where
        S: StateScope + ?Sized,
    {
        let network = scope.owning_network();
        if !network.has_id() {
            log::info!("VPC ID is empty");
            return Ok(());
        }
        let network_id = network.id.as_str();

        let subnets = match self
            .client
            .list_subnets(&SubnetFilter::for_network(network_id))
        {
            Ok(subnets) => subnets,
            Err(e) if e.is_network_not_found() => {
                log::info!("VPC not found: {network_id}");
                return Ok(());
            }
            Err(e) => return Err(ReconcileError::provider(ProviderOperation::ListSubnets, e)),
        };

        for subnet in &subnets {
            self.client
                .delete_subnet(&subnet.network_id, &subnet.id)
                .map_err(|e| {
                    ReconcileError::provider_for(ProviderOperation::DeleteSubnet, &subnet.id, e)
                })?;
            log::info!("Deleted subnet {}", subnet.id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockNetworkClient, ProviderError};
    use crate::reconcile::test_support::{subnet, TestScope};
    use mockall::predicate::eq;
    use mockall::Sequence;

    #[test]
    fn test_empty_network_id_is_success() {
        let mut client = MockNetworkClient::new();
        client.expect_list_subnets().never();
        client.expect_delete_subnet().never();
        let service = SubnetService::new(client);

        service.delete_subnets(&TestScope::for_network("")).unwrap();
    }

    #[test]
    fn test_deletes_each_with_own_network_id() {
        let mut client = MockNetworkClient::new();
        client
            .expect_list_subnets()
            .withf(|f| f.network_id.as_deref() == Some("vpc-1"))
            .times(1)
            .returning(|_| Ok(vec![subnet("s-1", "vpc-1"), subnet("s-2", "vpc-stale")]));
        let mut seq = Sequence::new();
        client
            .expect_delete_subnet()
            .with(eq("vpc-1"), eq("s-1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        client
            .expect_delete_subnet()
            .with(eq("vpc-stale"), eq("s-2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        let service = SubnetService::new(client);

        let scope = TestScope::for_network("vpc-1");
        service.delete_subnets(&scope).unwrap();
        assert_eq!(scope.persist_calls, 0);
        assert_eq!(scope.set_calls, 0);
    }

    #[test]
    fn test_network_not_found_is_success() {
        let mut client = MockNetworkClient::new();
        client.expect_list_subnets().returning(|_| {
            Err(ProviderError::new(Some(404), Some("VPC.0202"), "vpc does not exist"))
        });
        client.expect_delete_subnet().never();
        let service = SubnetService::new(client);

        service.delete_subnets(&TestScope::for_network("vpc-1")).unwrap();
    }

    #[test]
    fn test_network_not_found_in_text_only() {
        let mut client = MockNetworkClient::new();
        client.expect_list_subnets().returning(|_| {
            Err(ProviderError::from_response(404, "error VPC.0202: vpc-1 not found"))
        });
        let service = SubnetService::new(client);

        service.delete_subnets(&TestScope::for_network("vpc-1")).unwrap();
    }

    #[test]
    fn test_network_not_found_after_gateway_code() {
        let mut client = MockNetworkClient::new();
        client.expect_list_subnets().returning(|_| {
            Err(ProviderError::from_response(
                502,
                "APIGW.0308 backend error: VPC.0202 vpc not found",
            ))
        });
        client.expect_delete_subnet().never();
        let service = SubnetService::new(client);

        service.delete_subnets(&TestScope::for_network("vpc-1")).unwrap();
    }

    #[test]
    fn test_other_list_error_is_returned() {
        let mut client = MockNetworkClient::new();
        client
            .expect_list_subnets()
            .returning(|_| Err(ProviderError::transport("connection reset")));
        let service = SubnetService::new(client);

        let err = service
            .delete_subnets(&TestScope::for_network("vpc-1"))
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to list subnets"));
    }

    #[test]
    fn test_first_delete_failure_stops_pass() {
        let mut client = MockNetworkClient::new();
        client.expect_list_subnets().returning(|_| {
            Ok(vec![
                subnet("s-1", "vpc-1"),
                subnet("s-2", "vpc-1"),
                subnet("s-3", "vpc-1"),
            ])
        });
        client
            .expect_delete_subnet()
            .with(eq("vpc-1"), eq("s-1"))
            .times(1)
            .returning(|_, _| Ok(()));
        client
            .expect_delete_subnet()
            .with(eq("vpc-1"), eq("s-2"))
            .times(1)
            .returning(|_, _| Err(ProviderError::new(Some(409), Some("VPC.0211"), "subnet in use")));
        client
            .expect_delete_subnet()
            .with(eq("vpc-1"), eq("s-3"))
            .never();
        let service = SubnetService::new(client);

        let err = service
            .delete_subnets(&TestScope::for_network("vpc-1"))
            .unwrap_err();
        match err {
            ReconcileError::ProviderCall {
                operation, target, ..
            } => {
                assert_eq!(operation, ProviderOperation::DeleteSubnet);
                assert_eq!(target.as_deref(), Some("s-2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
