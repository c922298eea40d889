use creditrust_ledger::LearningModule;

fn module(id: u64, title: &str, description: &str, difficulty: &str, xp_reward: u64) -> LearningModule {
    LearningModule {
        id,
        title: title.to_string(),
        description: description.to_string(),
        difficulty: difficulty.to_string(),
        xp_reward,
        completed: false,
    }
}

/// Modules shown when the contract publishes none.
pub fn default_modules() -> Vec<LearningModule> {
    let mut modules = vec![
        module(1, "Wallet Basics", "Learn how to set up and secure your crypto wallet", "Beginner", 100),
        module(2, "Smart Contracts 101", "Understanding blockchain smart contracts", "Intermediate", 200),
        module(3, "NFT Creation", "Create and mint your first NFT", "Advanced", 300),
        module(4, "DeFi Fundamentals", "Explore decentralized finance protocols", "Intermediate", 250),
        module(5, "dApp Development", "Build your first decentralized application", "Advanced", 400),
        module(6, "DAO Governance", "Participate in decentralized governance", "Intermediate", 200),
    ];
    // Connecting a wallet is the first lesson.
    modules[0].completed = true;
    modules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue() {
        let modules = default_modules();
        assert_eq!(modules.len(), 6);
        assert_eq!(modules[0].title, "Wallet Basics");
        assert!(modules[0].completed);
        assert!(modules[1..].iter().all(|m| !m.completed));
        assert_eq!(modules.iter().map(|m| m.xp_reward).sum::<u64>(), 1450);
        let ids: Vec<u64> = modules.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }
}
