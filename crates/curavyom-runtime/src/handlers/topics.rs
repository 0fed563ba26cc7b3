//! Canned topic responses.

use async_trait::async_trait;

use curavyom_core::IntentLabel;

use super::{Fragment, HandlerError, TopicHandler};

/// A fixed response for one topic intent.
#[derive(Debug)]
pub struct TopicTemplate {
    pub label: IntentLabel,
    pub text: &'static str,
    pub workflow: &'static [&'static str],

    /// Reported as `metadata.confidence_score` when set
    pub confidence: Option<u8>,

    pub annotate: bool,
}

pub struct TemplateHandler {
    template: &'static TopicTemplate,
}

impl TemplateHandler {
    pub fn new(template: &'static TopicTemplate) -> Self {
        Self { template }
    }

    /// Handler for `label`, if it has a template.
    pub fn for_label(label: IntentLabel) -> Option<Self> {
        TOPIC_TEMPLATES
            .iter()
            .find(|t| t.label == label)
            .map(Self::new)
    }

    pub fn label(&self) -> IntentLabel {
        self.template.label
    }
}

#[async_trait]
impl TopicHandler for TemplateHandler {
    fn name(&self) -> &str {
        self.template.label.as_str()
    }

    async fn handle(&self, _query: &str, _timestamp: &str) -> Result<Fragment, HandlerError> {
        let mut fragment = Fragment::new(self.template.text, self.template.workflow.iter().copied());
        if let Some(confidence) = self.template.confidence {
            fragment = fragment.with_metadata("confidence_score", serde_json::json!(confidence));
        }
        Ok(fragment)
    }

    fn annotate(&self) -> bool {
        self.template.annotate
    }
}

macro_rules! template {
    ($label:ident, $workflow:expr, $confidence:expr, $text:expr) => {
        TopicTemplate {
            label: IntentLabel::$label,
            text: $text,
            workflow: $workflow,
            confidence: $confidence,
            annotate: true,
        }
    };
}

pub static TOPIC_TEMPLATES: &[TopicTemplate] = &[
    template!(Safety, &["clinical", "regulatory"], Some(91), concat!(
        "**Safety & Toxicity Profile**\n\n",
        "**Clinical Specialist Analysis:**\n",
        "- **Common Side Effects:** Gastrointestinal discomfort (nausea, diarrhea) in ~15% of patients.\n",
        "- **Serious Adverse Events:** Rare cases of lactic acidosis (<0.01%).\n",
        "- **Contraindications:** Renal impairment (eGFR < 30 mL/min).\n\n",
        "**Risk Assessment:**\n",
        "The safety profile is well-established with a favorable risk-benefit ratio for the target indication."
    )),
    template!(Mechanism, &["clinical", "doc"], Some(93), concat!(
        "**Mechanism of Action (MoA)**\n\n",
        "**Primary Pathway:**\n",
        "Inhibition of mitochondrial complex I, leading to increased AMP/ATP ratio and activation of AMPK (AMP-activated protein kinase).\n\n",
        "**Downstream Effects:**\n",
        "- Suppression of hepatic gluconeogenesis.\n",
        "- Enhancement of peripheral insulin sensitivity.\n",
        "- Potential modulation of mTORC1 pathway (implicated in aging and longevity)."
    )),
    template!(Clinical, &["clinical"], Some(90), concat!(
        "**Clinical Trial Landscape**\n\n",
        "**Clinical Specialist Findings:**\n",
        "- **Total Trials:** 142 active or recruiting studies.\n",
        "- **Key Phase 3 Trial (NCT01234567):** Showed 25% reduction in primary endpoint vs. placebo (p < 0.01).\n",
        "- **Recruitment Status:** High enrollment rates in North America and Europe.\n\n",
        "**Recommendation:** Data supports progression to pivotal repurposing trials."
    )),
    template!(Market, &["market"], Some(88), concat!(
        "**Market & Commercial Analysis**\n\n",
        "**Market Specialist Insights:**\n",
        "- **Total Addressable Market (TAM):** $4.5 Billion (Global, 2025 est).\n",
        "- **CAGR:** 6.2% (2025-2030).\n",
        "- **Competition:** Moderate. Two generic competitors hold 40% market share.\n\n",
        "**ROI Projection:**\n",
        "Estimated peak sales of $250M/year with a Net Present Value (NPV) of $85M."
    )),
    template!(Regulatory, &["regulatory"], Some(97), concat!(
        "**Regulatory Pathway Analysis**\n\n",
        "**Regulatory Specialist Insights:**\n",
        "- **Approval Pathway:** 505(b)(2) (NDA) due to existing safety data.\n",
        "- **Orphan Drug Status:** Potential eligibility for specific rare disease indications.\n",
        "- **Exclusivity:** 3-5 years of market exclusivity anticipated post-approval.\n\n",
        "**Compliance Risk:** Low. No major red flags in prior FDA correspondence."
    )),
    template!(Dosage, &["clinical", "doc"], Some(93), concat!(
        "**Dosage & Formulation Strategy**\n\n",
        "**Clinical Specialist Findings:**\n",
        "- **Recommended Dose:** 500mg - 1000mg twice daily.\n",
        "- **Formulation:** Extended-release (XR) tablets to improve compliance and reduce GI side effects.\n",
        "- **Route of Administration:** Oral.\n\n",
        "**Bioavailability:** ~50-60% under fasting conditions."
    )),
    template!(IntellectualProperty, &["patent"], Some(100), concat!(
        "**Intellectual Property (IP) Landscape**\n\n",
        "**Patent Specialist Insights:**\n",
        "- **Primary Composition Patent:** Expired in 2002 (Genericized).\n",
        "- **Method of Use Patents:** Several active patents for specific combinations, expiring 2028-2030.\n",
        "- **Freedom to Operate (FTO):** Clear for monotherapy in target indication.\n\n",
        "**Litigation Risk:** Low. No active ANDA litigation found."
    )),
    template!(Manufacturing, &["doc", "regulatory"], None, concat!(
        "**Manufacturing & CMC Strategy**\n\n",
        "**Technical Operations Insights:**\n",
        "- **Synthesis:** 3-step synthesis from readily available starting materials. High yield (>85%).\n",
        "- **Impurity Profile:** Known genotoxic impurities are well-controlled below ICH limits.\n",
        "- **Stability:** Stable at room temperature for 24 months (Zone II).\n\n",
        "**Scale-Up Risk:** Low. Process is robust and validated at commercial scale."
    )),
    template!(Reimbursement, &["market"], Some(88), concat!(
        "**Reimbursement & Market Access**\n\n",
        "**Market Specialist Insights:**\n",
        "- **Payer Coverage:** Tier 1/2 status expected on major commercial formularies.\n",
        "- **Pricing Strategy:** Value-based pricing model recommended, targeting $5-10/day.\n",
        "- **HTA Assessment:** Likely positive recommendation from NICE/ICER due to cost-effectiveness vs. biologics.\n\n",
        "**Patient Access:** Low out-of-pocket costs expected."
    )),
    template!(Combination, &["clinical", "doc"], Some(93), concat!(
        "**Combination Therapy Potential**\n\n",
        "**Scientific Rationale:**\n",
        "- **Synergy:** Strong synergistic effect observed with SGLT2 inhibitors in pre-clinical models.\n",
        "- **Mechanism:** Complementary mechanisms targeting both insulin sensitivity and glucose excretion.\n\n",
        "**Drug-Drug Interactions:**\n",
        "No significant CYP450 interactions. Caution advised with cationic drugs eliminated by renal tubular secretion."
    )),
    template!(Competitor, &["market", "patent"], Some(82), concat!(
        "**Competitor Intelligence Landscape**\n\n",
        "**Market Specialist Insights:**\n",
        "- **Primary Competitor:** Drug X (BigPharma Co.) - Currently in Phase 3.\n",
        "- **Competitive Advantage:** Our candidate shows superior safety profile and oral bioavailability compared to Drug X (injectable).\n",
        "- **Market Share Risk:** Moderate. First-to-market advantage is critical.\n\n",
        "**Strategic Move:** Accelerate Phase 3 initiation to capture market share."
    )),
    template!(Demographics, &["clinical", "market"], Some(87), concat!(
        "**Patient Demographics & Epidemiology**\n\n",
        "**Clinical Specialist Findings:**\n",
        "- **Target Population:** Adults aged 45-75 with Type 2 Diabetes and early-stage renal disease.\n",
        "- **Prevalence:** ~10% of the global adult population.\n",
        "- **Key Segments:** High growth in emerging markets (Asia-Pacific, Latin America).\n\n",
        "**Recruitment Strategy:** Focus on sites with diverse patient populations."
    )),
    template!(SupplyChain, &["doc", "market"], Some(94), concat!(
        "**Supply Chain & Logistics Analysis**\n\n",
        "**Technical Operations Insights:**\n",
        "- **API Sourcing:** Dual sourcing strategy established (India & Europe) to mitigate geopolitical risk.\n",
        "- **Cold Chain:** Not required. Product is stable at ambient temperature.\n",
        "- **Distribution:** Standard pharmaceutical distribution channels are sufficient.\n\n",
        "**Risk Level:** Low. Robust supply chain resilience."
    )),
    template!(GlobalMarket, &["market"], Some(88), concat!(
        "**Global Market Dynamics**\n\n",
        "**International Market Specialist:**\n",
        "- **Global Sales:** Projected to reach $12B by 2028.\n",
        "- **Fastest Growing Region:** Asia-Pacific (CAGR 8.5%).\n",
        "- **Emerging Trends:** Shift towards personalized medicine in EU and North America.\n\n",
        "**Strategic Insight:** Prioritize market entry in Japan and China post-FDA approval."
    )),
    template!(RegionalRegulatory, &["regulatory"], Some(97), concat!(
        "**Regional Regulatory Intelligence**\n\n",
        "**Regulatory Specialist (Global Desk):**\n",
        "- **China (NMPA):** Requires local bridging study for approval (Category 1 drug).\n",
        "- **Japan (PMDA):** Harmonized with ICH guidelines; potential for accelerated review under 'Sakigake' designation.\n",
        "- **EU (EMA):** Centralized procedure recommended for broad market access.\n\n",
        "**Action Item:** Engage local consultants for NMPA submission strategy."
    )),
    template!(GlobalClinical, &["clinical"], Some(90), concat!(
        "**Global Clinical Footprint**\n\n",
        "**Clinical Specialist (Global Operations):**\n",
        "- **Multi-Regional Clinical Trials (MRCT):** Ongoing in 15 countries including Brazil, Poland, and South Korea.\n",
        "- **Diversity Strategy:** Actively recruiting underrepresented populations to meet FDA guidance.\n",
        "- **Site Performance:** High retention rates in Eastern European sites.\n\n",
        "**Operational Note:** Ensure supply chain robustness for global sites."
    )),
    template!(RareDisease, &["clinical", "regulatory"], Some(91), concat!(
        "**Rare Disease & Orphan Drug Intelligence**\n\n",
        "**Specialist Findings:**\n",
        "- **Disease Prevalence:** < 5 in 10,000 (EU definition).\n",
        "- **Genetic Basis:** Monogenic mutation identified in 80% of cases.\n",
        "- **Unmet Need:** High. No approved therapies currently exist.\n\n",
        "**Incentives:** Eligible for Orphan Drug Designation (7 years exclusivity in US, 10 in EU)."
    )),
    template!(Oncology, &["clinical", "market"], Some(87), concat!(
        "**Oncology & Cancer Therapeutics**\n\n",
        "**Oncology Specialist Insights:**\n",
        "- **Tumor Type:** Solid tumors with high mutational burden.\n",
        "- **Biomarker:** PD-L1 expression > 50% correlates with response.\n",
        "- **Treatment Landscape:** Crowded checkpoint inhibitor market; combination strategies are key.\n\n",
        "**Clinical Strategy:** Basket trial design targeting specific mutations across tumor types."
    )),
    template!(Infectious, &["clinical", "regulatory"], Some(91), concat!(
        "**Infectious Disease & Pandemic Preparedness**\n\n",
        "**Infectious Disease Specialist Insights:**\n",
        "- **Pathogen:** Multi-drug resistant (MDR) Gram-negative bacteria.\n",
        "- **Antimicrobial Resistance (AMR):** Critical priority pathogen on WHO list.\n",
        "- **Mechanism:** Novel mechanism bypassing efflux pumps.\n\n",
        "**Public Health Impact:** High potential to reduce hospital-acquired infections."
    )),
    template!(Chronic, &["clinical", "market"], Some(87), concat!(
        "**Chronic Disease Management**\n\n",
        "**Therapeutic Area Specialist:**\n",
        "- **Condition:** Type 2 Diabetes / Cardiovascular Risk.\n",
        "- **Patient Burden:** High daily pill burden; adherence is a key challenge.\n",
        "- **Innovation:** Once-weekly injectable formulation showing superior compliance.\n\n",
        "**Market Trend:** Shift towards holistic cardiometabolic management."
    )),
    template!(Tropical, &["clinical", "regulatory"], Some(91), concat!(
        "**Tropical & Neglected Tropical Diseases (NTDs)**\n\n",
        "**Global Health Specialist:**\n",
        "- **Focus:** Malaria, Dengue, and Leishmaniasis.\n",
        "- **Challenges:** Vector control and lack of commercial incentives for R&D.\n",
        "- **Innovation:** New vaccines (e.g., R21/Matrix-M) showing promise.\n\n",
        "**Funding:** Heavily reliant on public-private partnerships (e.g., Gates Foundation)."
    )),
    template!(Autoimmune, &["market", "clinical"], None, concat!(
        "**Autoimmune & Immunology Landscape**\n\n",
        "**Immunology Specialist:**\n",
        "- **Key Indications:** Rheumatoid Arthritis, Psoriasis, IBD.\n",
        "- **Mechanism:** JAK inhibitors and IL-17/IL-23 antagonists gaining market share.\n",
        "- **Biosimilars:** Increasing competition from Adalimumab biosimilars driving down costs.\n\n",
        "**Market:** High value, competitive landscape."
    )),
    template!(MentalHealth, &["clinical", "market"], Some(87), concat!(
        "**Mental Health & Psychiatry**\n\n",
        "**Neuroscience Specialist:**\n",
        "- **Focus:** Treatment-Resistant Depression (TRD) and Anxiety Disorders.\n",
        "- **Novel Therapies:** Psychedelic-assisted therapies (Psilocybin, MDMA) in advanced trials.\n",
        "- **Digital Health:** Growing integration of CBT apps with pharmacotherapy.\n\n",
        "**Unmet Need:** Rapid-acting antidepressants with fewer side effects."
    )),
    template!(Geriatric, &["clinical", "demographics"], Some(92), concat!(
        "**Geriatric Medicine & Aging**\n\n",
        "**Gerontology Specialist:**\n",
        "- **Key Issues:** Polypharmacy, Sarcopenia, and Frailty.\n",
        "- **Drug Development:** Focus on 'Geroscience' - targeting aging biology directly.\n",
        "- **Clinical Trials:** Need for inclusion of elderly populations in standard trials.\n\n",
        "**Demographic Shift:** Rapidly aging global population increasing demand for age-friendly formulations."
    )),
    template!(Pediatric, &["regulatory", "clinical"], Some(94), concat!(
        "**Pediatric Drug Development**\n\n",
        "**Pediatric Specialist:**\n",
        "- **Regulatory:** FDA PREA and BPCA require pediatric study plans (PSP).\n",
        "- **Formulation:** Need for age-appropriate formulations (e.g., liquids, mini-tablets).\n",
        "- **Ethics:** Enhanced safeguards for vulnerable populations in clinical trials.\n\n",
        "**Incentives:** Additional 6 months of market exclusivity for completed pediatric studies."
    )),
    template!(WomensHealth, &["market", "clinical"], Some(90), concat!(
        "**Women's Health & FemTech**\n\n",
        "**Women's Health Specialist:**\n",
        "- **Focus:** Endometriosis, PCOS, and Menopause management.\n",
        "- **Innovation:** Non-hormonal therapies for hot flashes (e.g., NK3 antagonists).\n",
        "- **Market:** Historically underserved but rapidly growing investment sector.\n\n",
        "**Trend:** Integration of diagnostics and therapeutics for fertility."
    )),
    template!(PrecisionMedicine, &["clinical", "doc"], Some(93), concat!(
        "**Precision Medicine & Genomics**\n\n",
        "**Genomics Specialist:**\n",
        "- **Approach:** Tailoring treatment based on individual genetic profiles (Pharmacogenomics).\n",
        "- **Technology:** Next-Generation Sequencing (NGS) for companion diagnostics.\n",
        "- **Impact:** Higher efficacy and reduced adverse events in oncology and rare diseases.\n\n",
        "**Future:** Expansion into polygenic risk scores for chronic disease prevention."
    )),
    template!(DigitalTherapeutics, &["regulatory", "market"], Some(90), concat!(
        "**Digital Therapeutics (DTx)**\n\n",
        "**Digital Health Specialist:**\n",
        "- **Definition:** Evidence-based therapeutic interventions driven by high-quality software.\n",
        "- **Regulation:** FDA 'Software as a Medical Device' (SaMD) pathway.\n",
        "- **Applications:** Cognitive Behavioral Therapy (CBT) for insomnia, ADHD, and substance abuse.\n\n",
        "**Reimbursement:** Evolving landscape; Germany's DiGA model is a global pioneer."
    )),
    TopicTemplate {
        label: IntentLabel::Greeting,
        text: concat!(
            "**Hello! I am the CuraVyom Master Orchestrator.**\n\n",
            "I can assist you with:\n",
            "- **Drug Repurposing Analysis** (e.g., 'Analyze Metformin')\n",
            "- **Comparison** (e.g., 'Compare Drug A and Drug B')\n",
            "- **Hypotheses** (e.g., 'Propose new indications for Lithium')\n",
            "- **Reports** (e.g., 'Generate a report on Metformin')\n",
            "- **Safety Profiles** (e.g., 'What are the side effects?')\n",
            "- **Market Data** (e.g., 'What is the market size?')\n",
            "- **Regulatory Pathways** (e.g., 'Is it FDA approved?')\n",
            "- **Dosage Info** (e.g., 'What is the recommended dose?')\n",
            "- **Patent Status** (e.g., 'When does the patent expire?')\n",
            "- **Manufacturing/CMC** (e.g., 'Is the synthesis scalable?')\n",
            "- **Reimbursement** (e.g., 'Will insurance cover it?')\n",
            "- **Combinations** (e.g., 'Can it be combined with other drugs?')\n",
            "- **Competitors** (e.g., 'Who are the rivals?')\n",
            "- **Demographics** (e.g., 'Target patient population?')\n",
            "- **Supply Chain** (e.g., 'Sourcing risks?')\n",
            "- **Global Intelligence** (e.g., 'Global market trends', 'Approval in China', 'Global trials')\n",
            "- **Disease Intelligence** (e.g., 'Rare diseases', 'Oncology trends', 'Infectious diseases')\n",
            "- **Expanded Health** (e.g., 'Tropical diseases', 'Autoimmune', 'Mental health', 'Geriatrics')\n",
            "- **Future Tech & Special Populations** (e.g., 'Pediatrics', 'Women's health', 'Precision medicine', 'DTx')\n\n",
            "How can I help you today?"
        ),
        workflow: &["general"],
        confidence: Some(100),
        annotate: false,
    },
];
