use crate::chart::ChartSpec;
use crate::dataset::Dataset;

/// Persistence seam for uploaded datasets. Listings come back newest first.
pub trait DatasetStore {
    fn save(&mut self, dataset: Dataset);
    fn find_all(&self) -> Vec<&Dataset>;
    fn find_by_name(&self, file_name: &str) -> Option<&Dataset>;
}

/// Persistence seam for saved chart specs, newest first.
pub trait ChartSpecStore {
    fn save(&mut self, spec: ChartSpec);
    fn find_all(&self) -> Vec<&ChartSpec>;
}

#[derive(Debug, Default)]
pub struct MemoryDatasetStore {
    datasets: Vec<Dataset>,
}

impl DatasetStore for MemoryDatasetStore {
    fn save(&mut self, dataset: Dataset) {
        self.datasets.push(dataset);
    }

    fn find_all(&self) -> Vec<&Dataset> {
        let mut all: Vec<&Dataset> = self.datasets.iter().collect();
        all.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        all
    }

    fn find_by_name(&self, file_name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.file_name == file_name)
    }
}

#[derive(Debug, Default)]
pub struct MemoryChartSpecStore {
    specs: Vec<ChartSpec>,
}

impl ChartSpecStore for MemoryChartSpecStore {
    fn save(&mut self, spec: ChartSpec) {
        self.specs.push(spec);
    }

    fn find_all(&self) -> Vec<&ChartSpec> {
        let mut all: Vec<&ChartSpec> = self.specs.iter().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }
}
